use std::net::IpAddr;
use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Configuration handed to [`SpfResolver::new`](super::SpfResolver::new).
///
/// With no `nameservers`, the system configuration (`/etc/resolv.conf`) is
/// used and only the timeout and attempt count are overridden.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub timeout_ms: u64,
    pub attempts: usize,
    pub nameservers: Vec<IpAddr>,
    pub port: u16,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            attempts: 2,
            nameservers: Vec::new(),
            port: 53,
        }
    }
}

impl ResolverSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_nameserver(mut self, ip: IpAddr) -> Self {
        if !self.nameservers.contains(&ip) {
            self.nameservers.push(ip);
        }
        self
    }

    pub fn with_nameservers<I>(mut self, ips: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        for ip in ips {
            self = self.with_nameserver(ip);
        }
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Per-query timeout. Zero keeps the resolver's own default.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    pub fn uses_system_nameservers(&self) -> bool {
        self.nameservers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nameservers_deduplicated() {
        let ip: IpAddr = "192.0.2.53".parse().unwrap();
        let settings = ResolverSettings::new().with_nameservers([ip, ip]);
        assert_eq!(settings.nameservers, vec![ip]);
        assert!(!settings.uses_system_nameservers());
    }

    #[test]
    fn zero_timeout_disables_override() {
        let settings = ResolverSettings::new().with_timeout_ms(0);
        assert_eq!(settings.timeout(), None);
        assert_eq!(
            ResolverSettings::default().timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn attempts_at_least_one() {
        assert_eq!(ResolverSettings::new().with_attempts(0).attempts, 1);
    }
}
