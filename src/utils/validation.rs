//! Common validation helpers shared across modules

use crate::error::TransportError;
use std::time::Duration;

/// Extract the port text of an authority (`user@host:port`, `[::1]:port`)
pub fn authority_port(authority: &str) -> Option<&str> {
    let host_port = authority.rsplit_once('@').map(|(_, hp)| hp).unwrap_or(authority);
    let after_host = host_port.rfind(']').map(|i| &host_port[i + 1..]).unwrap_or(host_port);
    after_host.rfind(':').map(|i| &after_host[i + 1..])
}

/// Reject ports a TCP dial could never reach. An empty port means the scheme default.
pub fn validate_dial_port(authority: &str) -> Result<(), TransportError> {
    match authority_port(authority) {
        Some(port) if !port.is_empty() => port.parse::<u16>().map(|_| ()).map_err(|_| TransportError::InvalidPort(port.to_string())),
        _ => Ok(()),
    }
}

/// Validate that a configured timeout is usable
pub fn validate_timeout(name: &str, timeout: Duration) -> Result<(), String> {
    if timeout.is_zero() {
        return Err(format!("{} must be greater than zero", name));
    }
    Ok(())
}

/// Check if a string is empty or only whitespace
pub fn is_empty_or_whitespace(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_port() {
        assert_eq!(authority_port("localhost:8080"), Some("8080"));
        assert_eq!(authority_port("localhost"), None);
        assert_eq!(authority_port("user:pw@example.com"), None);
        assert_eq!(authority_port("user:pw@example.com:81"), Some("81"));
        assert_eq!(authority_port("[::1]"), None);
        assert_eq!(authority_port("[::1]:9000"), Some("9000"));
    }

    #[test]
    fn test_validate_dial_port_valid() {
        assert!(validate_dial_port("localhost:1").is_ok());
        assert!(validate_dial_port("localhost:65535").is_ok());
        assert!(validate_dial_port("localhost").is_ok());
        assert!(validate_dial_port("localhost:").is_ok());
    }

    #[test]
    fn test_validate_dial_port_invalid() {
        let err = validate_dial_port("localhost:655575").unwrap_err();
        assert_eq!(err.to_string(), "dial tcp: invalid port 655575");
        assert!(validate_dial_port("localhost:http").is_err());
    }

    #[test]
    fn test_validate_timeout() {
        assert!(validate_timeout("dial_timeout_secs", Duration::from_secs(1)).is_ok());
        assert_eq!(validate_timeout("dial_timeout_secs", Duration::ZERO).unwrap_err(), "dial_timeout_secs must be greater than zero");
    }

    #[test]
    fn test_is_empty_or_whitespace() {
        assert!(is_empty_or_whitespace(""));
        assert!(is_empty_or_whitespace("   "));
        assert!(is_empty_or_whitespace("\t\n"));
        assert!(!is_empty_or_whitespace("hello"));
    }
}
