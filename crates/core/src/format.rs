//! pt-BR display helpers.

const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Format an amount as Brazilian reais, e.g. `R$ 1.234,56` or `-R$ 5,00`.
/// Non-finite amounts format as zero.
pub fn format_brl(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac:02}")
}

/// Lower-case Portuguese month name for `month` in 1..=12.
pub fn month_name_pt(month: u32) -> Option<&'static str> {
    MONTHS_PT.get(month.checked_sub(1)? as usize).copied()
}
