// ============================================================================
// Utilitaires de formatage
// ============================================================================
// Formatage des montants pour l'affichage (table, panneaux, barres)
// ============================================================================

/// Formate un montant saisi comme un littéral décimal
///
/// Les valeurs entières gardent une décimale ("100.0"), les autres sont
/// affichées avec la représentation la plus courte ("0.5", "1234.5678").
/// Au-delà de 1e16 ou sous 1e-4, la notation scientifique prend le relais
/// avec un exposant signé sur deux chiffres minimum ("1e+16", "1.5e-05").
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{}", amount);
    }

    let abs = amount.abs();
    if abs >= 1e16 || (abs != 0.0 && abs < 1e-4) {
        format_scientific(amount)
    } else if amount.fract() == 0.0 {
        format!("{:.1}", amount)
    } else {
        format!("{}", amount)
    }
}

/// "1.5e-5" (format Rust) → "1.5e-05"
fn format_scientific(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

/// Formate un nombre avec séparateurs de milliers et `decimals` décimales
///
/// Exemple : 1234567.891 avec 2 décimales → "1,234,567.89"
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    // Insère une virgule toutes les 3 positions en partant de la droite
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Formate un montant en dollars avec séparateurs ("$1,234.56")
pub fn format_usd(value: f64) -> String {
    format!("${}", format_thousands(value, 2))
}

/// Formate une capitalisation de manière compacte pour les barres du graphique
///
/// 1.5e12 → "$1.5T", 3.2e9 → "$3.2B", 4.5e6 → "$4.5M", 12_500 → "$12.5K"
pub fn format_compact_usd(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000_000.0 {
        format!("${:.1}T", value / 1_000_000_000_000.0)
    } else if abs >= 1_000_000_000.0 {
        format!("${:.1}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(100.0), "100.0");
        assert_eq!(format_amount(0.5), "0.5");
        assert_eq!(format_amount(1234.5678), "1234.5678");
        assert_eq!(format_amount(0.0001), "0.0001");
    }

    #[test]
    fn test_format_amount_scientific_bounds() {
        assert_eq!(format_amount(1e16), "1e+16");
        assert_eq!(format_amount(1.234e20), "1.234e+20");
        assert_eq!(format_amount(1e-5), "1e-05");
        assert_eq!(format_amount(1.5e-7), "1.5e-07");
        assert_eq!(format_amount(9_999_999_999_999_998.0), "9999999999999998.0");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(999.0, 2), "999.00");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(-2500000.0, 2), "-2,500,000.00");
        assert_eq!(format_thousands(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(2_345_678_901_234.567), "$2,345,678,901,234.57");
    }

    #[test]
    fn test_format_compact_usd() {
        assert_eq!(format_compact_usd(1.5e12), "$1.5T");
        assert_eq!(format_compact_usd(3.2e9), "$3.2B");
        assert_eq!(format_compact_usd(4.5e6), "$4.5M");
        assert_eq!(format_compact_usd(12_500.0), "$12.5K");
        assert_eq!(format_compact_usd(950.0), "$950");
    }
}
