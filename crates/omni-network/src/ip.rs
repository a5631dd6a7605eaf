use crate::error::{NetworkError, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub struct IpDetector;

impl IpDetector {
    pub fn parse_ip(ip: &str) -> Result<IpAddr> {
        ip.trim()
            .parse::<IpAddr>()
            .map_err(|_| NetworkError::InvalidIp(ip.to_string()))
    }

    /// Addresses a public GeoIP service cannot say anything about.
    pub fn is_private_ip(ip: &IpAddr) -> bool {
        match ip {
            IpAddr::V4(ipv4) => {
                ipv4.is_private()
                    || ipv4.is_loopback()
                    || ipv4.is_link_local()
                    || ipv4.is_unspecified()
            }
            IpAddr::V6(ipv6) => {
                ipv6.is_loopback()
                    || ipv6.is_unspecified()
                    || (ipv6.segments()[0] & 0xfe00) == 0xfc00
                    || (ipv6.segments()[0] & 0xffc0) == 0xfe80
            }
        }
    }

    pub fn is_valid_ipv4(ip: &str) -> bool {
        ip.parse::<Ipv4Addr>().is_ok()
    }

    pub fn is_valid_ipv6(ip: &str) -> bool {
        ip.parse::<Ipv6Addr>().is_ok()
    }

    pub fn is_valid_ip(ip: &str) -> bool {
        ip.parse::<IpAddr>().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_validation() {
        assert!(IpDetector::is_valid_ipv4("192.168.1.1"));
        assert!(!IpDetector::is_valid_ipv4("256.256.256.256"));
        assert!(IpDetector::is_valid_ipv6("::1"));
        assert!(!IpDetector::is_valid_ipv6("invalid"));
        assert!(IpDetector::is_valid_ip("2001:db8::1"));
    }

    #[test]
    fn test_parse_ip() {
        assert_eq!(
            IpDetector::parse_ip(" 8.8.8.8 ").unwrap(),
            IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))
        );
        assert!(matches!(IpDetector::parse_ip("example.com"), Err(NetworkError::InvalidIp(_))));
    }

    #[test]
    fn test_private_ip_detection() {
        let private_ip = "192.168.1.1".parse::<IpAddr>().expect("Valid private IP");
        let public_ip = "8.8.8.8".parse::<IpAddr>().expect("Valid public IP");
        let unique_local = "fd00::1".parse::<IpAddr>().expect("Valid ULA");
        let link_local = "fe80::1".parse::<IpAddr>().expect("Valid link-local");

        assert!(IpDetector::is_private_ip(&private_ip));
        assert!(!IpDetector::is_private_ip(&public_ip));
        assert!(IpDetector::is_private_ip(&unique_local));
        assert!(IpDetector::is_private_ip(&link_local));
    }
}
