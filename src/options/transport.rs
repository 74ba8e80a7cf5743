//! HTTP transport and the control client that talks to it.

use crate::error::GenerateError;
use crate::options::OptionSet;
use std::str::FromStr;

/// Value of `http-socket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Inet,
    Unix,
}

impl FromStr for TransportKind {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inet" => Ok(TransportKind::Inet),
            "unix" => Ok(TransportKind::Unix),
            other => Err(GenerateError::InvalidTransportKind(other.to_string())),
        }
    }
}

/// The one active HTTP transport for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSpec {
    Inet {
        /// `host:port` or a bare port.
        port: String,
        username: String,
        password: String,
    },
    Unix {
        socket_path: String,
        permissions: String,
        username: String,
        password: String,
    },
}

impl TransportSpec {
    pub fn resolve(options: &OptionSet) -> Result<Self, GenerateError> {
        let kind: TransportKind = options.get("http-socket").unwrap_or("inet").parse()?;
        let username = options.get_or("user", "");
        let password = options.get_or("password", "");

        Ok(match kind {
            TransportKind::Inet => TransportSpec::Inet {
                port: options.get_or("port", "127.0.0.1:9001"),
                username,
                password,
            },
            TransportKind::Unix => TransportSpec::Unix {
                socket_path: options.get_or("file", ""),
                permissions: options.get_or("chmod", "0700"),
                username,
                password,
            },
        })
    }

    /// URL a control client uses to reach this transport.
    pub fn server_url(&self) -> String {
        match self {
            TransportSpec::Inet { port, .. } if port.contains(':') => format!("http://{}", port),
            TransportSpec::Inet { port, .. } => format!("http://localhost:{}", port),
            TransportSpec::Unix { socket_path, .. } => format!("unix://{}", socket_path),
        }
    }

    pub fn credentials(&self) -> (&str, &str) {
        match self {
            TransportSpec::Inet {
                username, password, ..
            }
            | TransportSpec::Unix {
                username, password, ..
            } => (username.as_str(), password.as_str()),
        }
    }
}

/// `[supervisorctl]` settings, also injected into every event listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlClientSpec {
    pub server_url: String,
    pub username: String,
    pub password: String,
}

impl ControlClientSpec {
    /// Explicit `serverurl`, else derived from the transport.
    pub fn resolve(options: &OptionSet, transport: &TransportSpec) -> Self {
        let (username, password) = transport.credentials();
        ControlClientSpec {
            server_url: options
                .get("serverurl")
                .map(str::to_string)
                .unwrap_or_else(|| transport.server_url()),
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inet_is_the_default() {
        let t = TransportSpec::resolve(&OptionSet::new()).unwrap();
        assert!(matches!(t, TransportSpec::Inet { .. }));
        assert_eq!(t.server_url(), "http://127.0.0.1:9001");
    }

    #[test]
    fn bare_port_gets_localhost() {
        let t = TransportSpec::resolve(&OptionSet::new().with("port", "9002")).unwrap();
        assert_eq!(t.server_url(), "http://localhost:9002");
    }

    #[test]
    fn unix_socket_url() {
        let opts = OptionSet::new()
            .with("http-socket", "unix")
            .with("file", "/tmp/s.sock");
        let t = TransportSpec::resolve(&opts).unwrap();
        assert_eq!(
            t,
            TransportSpec::Unix {
                socket_path: "/tmp/s.sock".into(),
                permissions: "0700".into(),
                username: String::new(),
                password: String::new(),
            }
        );
        assert_eq!(t.server_url(), "unix:///tmp/s.sock");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = TransportSpec::resolve(&OptionSet::new().with("http-socket", "tcp")).unwrap_err();
        assert_eq!(err, GenerateError::InvalidTransportKind("tcp".into()));
    }

    #[test]
    fn explicit_server_url_wins() {
        let opts = OptionSet::new()
            .with("serverurl", "http://ctl.example:80")
            .with("user", "admin")
            .with("password", "s3cret");
        let t = TransportSpec::resolve(&opts).unwrap();
        let ctl = ControlClientSpec::resolve(&opts, &t);
        assert_eq!(ctl.server_url, "http://ctl.example:80");
        assert_eq!(ctl.username, "admin");
        assert_eq!(ctl.password, "s3cret");
    }
}
