use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use reqwest::Url;

use crate::error::CoreError;

/// Default Tendermint RPC listen port.
pub const DEFAULT_PORT: u16 = 26657;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_SCHEME: &str = "http";

/// Address of the node a client talks to. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(scheme: &str, host: &str, port: u16) -> Result<Self, CoreError> {
        let scheme = scheme.to_ascii_lowercase();
        if !matches!(scheme.as_str(), "http" | "https") {
            return Err(CoreError::InvalidArgument(format!(
                "unsupported endpoint scheme `{scheme}`; expected http or https"
            )));
        }
        let host = host.trim();
        if host.is_empty() {
            return Err(CoreError::InvalidArgument(
                "endpoint host must not be empty".to_owned(),
            ));
        }

        // IPv6 literals are stored bare; `url()` adds the brackets back.
        let host = host
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .filter(|inner| inner.parse::<Ipv6Addr>().is_ok())
            .unwrap_or(host);
        let is_ipv6 = host.parse::<Ipv6Addr>().is_ok();
        if !is_ipv6 && host.contains(['/', '?', '#', '@', ':', '[', ']']) {
            return Err(CoreError::InvalidArgument(format!(
                "invalid endpoint host `{host}`; pass the port separately and omit scheme or path"
            )));
        }

        Ok(Self {
            scheme,
            host: host.to_owned(),
            port,
        })
    }

    /// Parse `scheme://host[:port]`. Without an explicit port the
    /// Tendermint default is used, not the scheme's.
    pub fn parse(connection: &str) -> Result<Self, CoreError> {
        let parsed = Url::parse(connection).map_err(|e| {
            CoreError::InvalidArgument(format!(
                "invalid endpoint `{connection}`: expected HTTP(S) URL ({e})"
            ))
        })?;
        if !matches!(parsed.path(), "" | "/") || parsed.query().is_some() {
            return Err(CoreError::InvalidArgument(format!(
                "endpoint `{connection}` must not carry a path or query"
            )));
        }
        let host = parsed.host_str().ok_or_else(|| {
            CoreError::InvalidArgument(format!("endpoint `{connection}` has no host"))
        })?;

        // `Url` drops a port equal to the scheme default, so `http://node:80`
        // and `http://node` look the same after parsing.
        let port = match parsed.port() {
            Some(port) => port,
            None if has_explicit_port(connection) => {
                parsed.port_or_known_default().unwrap_or(DEFAULT_PORT)
            }
            None => DEFAULT_PORT,
        };

        Self::new(parsed.scheme(), host, port)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `scheme://host:port`, the single URL every request is posted to.
    pub fn url(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("{}://[{}]:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_owned(),
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

impl FromStr for Endpoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn has_explicit_port(connection: &str) -> bool {
    let rest = connection
        .split_once("://")
        .map_or(connection, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    authority.rsplit_once(':').is_some_and(|(_, port)| {
        !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_targets_local_node() {
        let endpoint = Endpoint::default();
        assert_eq!(endpoint.url(), "http://127.0.0.1:26657");
    }

    #[test]
    fn new_rejects_unsupported_scheme() {
        let err = Endpoint::new("ftp", "example.com", 21).expect_err("must reject ftp");
        assert!(err.to_string().contains("unsupported endpoint scheme"));
    }

    #[test]
    fn new_rejects_empty_host() {
        let err = Endpoint::new("http", "  ", DEFAULT_PORT).expect_err("must reject empty host");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn parse_http_url_with_port() {
        let endpoint = Endpoint::parse("https://node.example:443").expect("should parse");
        assert_eq!(endpoint.scheme(), "https");
        assert_eq!(endpoint.host(), "node.example");
        assert_eq!(endpoint.port(), 443);
    }

    #[test]
    fn parse_without_port_uses_tendermint_default() {
        let endpoint = Endpoint::parse("http://node.example").expect("should parse");
        assert_eq!(endpoint.port(), DEFAULT_PORT);
        assert_eq!(endpoint.url(), "http://node.example:26657");
    }

    #[test]
    fn parse_keeps_explicit_scheme_default_port() {
        let endpoint = Endpoint::parse("http://node.example:80/").expect("should parse");
        assert_eq!(endpoint.port(), 80);
    }

    #[test]
    fn parse_rejects_path() {
        let err = Endpoint::parse("http://node.example:26657/rpc").expect_err("must reject path");
        assert!(err.to_string().contains("must not carry a path"));
    }

    #[test]
    fn ipv6_host_is_bracketed_in_url() {
        let endpoint = Endpoint::new("http", "::1", DEFAULT_PORT).expect("should build");
        assert_eq!(endpoint.url(), "http://[::1]:26657");

        let parsed: Endpoint = "http://[::1]:9000".parse().expect("should parse");
        assert_eq!(parsed.url(), "http://[::1]:9000");
    }

    #[test]
    fn ipv6_endpoint_is_the_same_however_it_is_built() {
        let built = Endpoint::new("http", "::1", 9000).expect("should build");
        let bracketed = Endpoint::new("http", "[::1]", 9000).expect("should build");
        let parsed = Endpoint::parse("http://[::1]:9000").expect("should parse");
        assert_eq!(parsed.host(), "::1");
        assert_eq!(built, parsed);
        assert_eq!(bracketed, parsed);
    }

    #[test]
    fn new_rejects_host_carrying_port_or_url_parts() {
        for host in ["node:8080", "node/rpc", "user@node", "node?x=1", "node#frag", "[node]"] {
            let err = Endpoint::new("http", host, DEFAULT_PORT).expect_err("must reject host");
            assert!(
                matches!(err, CoreError::InvalidArgument(_)),
                "host `{host}` must be an invalid argument"
            );
        }
    }
}
