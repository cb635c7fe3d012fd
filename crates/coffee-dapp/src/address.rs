//! Address display helpers.

/// Shorten an address for display: first 6 characters, "...", last 4.
///
/// Strings of 10 characters or fewer are returned unchanged.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Status line shown while a session is active.
pub fn connected_status(address: &str) -> String {
    format!("Connected: {}", short_address(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address_42_chars() {
        let addr = "0xAbCdEf0000000000000000000000000000001234";
        assert_eq!(addr.len(), 42);
        assert_eq!(short_address(addr), "0xAbCd...1234");
    }

    #[test]
    fn test_short_address_every_hex_address() {
        for fill in ['0', '7', 'a', 'F'] {
            let addr = format!("0x{}", fill.to_string().repeat(40));
            let short = short_address(&addr);
            assert_eq!(short, format!("{}...{}", &addr[..6], &addr[38..]));
        }
    }

    #[test]
    fn test_short_address_leaves_short_strings() {
        assert_eq!(short_address("0x1234"), "0x1234");
        assert_eq!(short_address(""), "");
    }

    #[test]
    fn test_connected_status() {
        assert_eq!(
            connected_status("0xAbCdEf0000000000000000000000000000wxyz"),
            "Connected: 0xAbCd...wxyz"
        );
    }
}
