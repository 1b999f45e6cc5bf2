/// Decimals of the native asset (wei -> ether).
pub const ETHER_DECIMALS: usize = 18;

const DISPLAY_DECIMALS: usize = 4;

/// Formats a wei amount as ether with 4 decimals, rounding half-up.
///
/// Integer strings are converted exactly, so values beyond `u128` are fine.
/// Anything else goes through `f64`; unparseable input renders as `"0"`.
pub fn format_ether(wei: &str) -> String {
    let wei = wei.trim();
    if wei.is_empty() {
        return "0".to_string();
    }

    if !wei.bytes().all(|b| b.is_ascii_digit()) {
        return match wei.parse::<f64>() {
            Ok(v) if v.is_finite() => format!("{:.*}", DISPLAY_DECIMALS, v / 1e18),
            _ => "0".to_string(),
        };
    }

    let digits = wei.trim_start_matches('0');
    let padded = format!("{:0>width$}", digits, width = ETHER_DECIMALS + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - ETHER_DECIMALS);

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(DISPLAY_DECIMALS))
        .collect();

    if frac_part.as_bytes()[DISPLAY_DECIMALS] >= b'5' {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let s: String = kept.iter().map(|&b| b as char).collect();
    let split = s.len() - DISPLAY_DECIMALS;
    format!("{}.{}", &s[..split], &s[split..])
}

/// `format_ether` with the unit suffix, for display.
pub fn format_ether_amount(wei: &str) -> String {
    format!("{} ETH", format_ether(wei))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero_without_decimals() {
        assert_eq!(format_ether(""), "0");
        assert_eq!(format_ether("   "), "0");
    }

    #[test]
    fn zero_keeps_four_decimals() {
        assert_eq!(format_ether("0"), "0.0000");
        assert_eq!(format_ether("000"), "0.0000");
    }

    #[test]
    fn whole_and_fractional_ether() {
        assert_eq!(format_ether("1000000000000000000"), "1.0000");
        assert_eq!(format_ether("2500000000000000000"), "2.5000");
        assert_eq!(format_ether("123456789000000000000"), "123.4568");
        assert_eq!(format_ether("123456789"), "0.0000");
    }

    #[test]
    fn rounds_half_up_with_carry() {
        assert_eq!(format_ether("99995000000000000"), "0.1000");
        assert_eq!(format_ether("9999950000000000000"), "10.0000");
        assert_eq!(format_ether("49999999999999"), "0.0000");
        assert_eq!(format_ether("50000000000000"), "0.0001");
    }

    #[test]
    fn oversized_input_does_not_fail() {
        let wei = "9".repeat(39);
        assert_eq!(format_ether(&wei), "1000000000000000000000.0000");
    }

    #[test]
    fn non_integer_input_falls_back() {
        assert_eq!(format_ether("1e18"), "1.0000");
        assert_eq!(format_ether("not-a-number"), "0");
    }

    #[test]
    fn amount_has_unit() {
        assert_eq!(format_ether_amount("2500000000000000000"), "2.5000 ETH");
    }
}
