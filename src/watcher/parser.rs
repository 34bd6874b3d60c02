//! Access-log line parsing.

use regex::Regex;

/// One parsed request line.
///
/// `pool` is `None` when neither the `pool=` field nor the upstream
/// address heuristics could determine a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    /// HTTP status code.
    pub status: u16,
    /// Backend pool serving the request, if determinable.
    pub pool: Option<String>,
    /// Upstream address, when the proxy recorded one.
    pub upstream_addr: Option<String>,
}

/// Upstream address substrings that identify a pool when the `pool=`
/// field carries the `-` sentinel.
const POOL_HINTS: &[(&str, &str)] = &[
    ("8081", "blue"),
    ("blue_app", "blue"),
    ("8082", "green"),
    ("green_app", "green"),
];

/// Parser for the nginx access-log format with the custom
/// `pool=... release=... upstream_status=... upstream_addr=...` suffix.
#[derive(Debug)]
pub struct LineParser {
    pattern: Regex,
}

impl LineParser {
    pub fn new() -> Self {
        let pattern = Regex::new(
            r#".*" (?P<status>\d{3}) \d+ "[^"]*" "[^"]*" pool=(?P<pool>\S+) release=\S+ upstream_status=\S+ upstream_addr=(?P<upstream_addr>\S+)"#,
        )
        .expect("log line pattern is valid");

        Self { pattern }
    }

    /// Parse one raw line.
    ///
    /// Lines that do not match the access-log shape yield `None`; a
    /// production log mixes formats and foreign lines are not errors.
    pub fn parse(&self, line: &str) -> Option<RequestRecord> {
        let caps = self.pattern.captures(line)?;

        let status: u16 = caps.name("status")?.as_str().parse().ok()?;
        let pool = caps.name("pool")?.as_str();
        let upstream_addr = caps.name("upstream_addr")?.as_str();

        let upstream_addr = (upstream_addr != "-").then(|| upstream_addr.to_string());
        let pool = match pool {
            "-" => upstream_addr.as_deref().and_then(infer_pool),
            named => Some(named.to_string()),
        };

        Some(RequestRecord {
            status,
            pool,
            upstream_addr,
        })
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an upstream address onto a pool name, e.g. `172.18.0.5:8081` → blue.
fn infer_pool(addr: &str) -> Option<String> {
    POOL_HINTS
        .iter()
        .find(|(hint, _)| addr.contains(hint))
        .map(|(_, pool)| (*pool).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access_line(status: u16, pool: &str, upstream_addr: &str) -> String {
        format!(
            "192.168.1.10 - - [05/Aug/2026:12:00:00 +0000] \"GET /api/orders HTTP/1.1\" \
             {status} 512 \"-\" \"curl/8.5\" pool={pool} release=v42 \
             upstream_status={status} upstream_addr={upstream_addr}"
        )
    }

    #[test]
    fn should_parse_status_pool_and_upstream() {
        // Arrange
        let parser = LineParser::new();
        let line = access_line(200, "blue", "172.18.0.5:8081");

        // Act
        let record = parser.parse(&line);

        // Assert
        let record = record.expect("line should parse");
        assert_eq!(record.status, 200);
        assert_eq!(record.pool.as_deref(), Some("blue"));
        assert_eq!(record.upstream_addr.as_deref(), Some("172.18.0.5:8081"));
    }

    #[test]
    fn should_return_none_for_foreign_lines() {
        // Arrange
        let parser = LineParser::new();

        // Act & Assert
        assert!(parser.parse("this is not an access log line").is_none());
        assert!(parser
            .parse("192.168.1.10 - - [05/Aug/2026:12:00:00 +0000] \"GET / HTTP/1.1\" 200 512")
            .is_none());
        assert!(parser.parse("").is_none());
    }

    #[test]
    fn should_infer_pool_from_upstream_port() {
        // Arrange
        let parser = LineParser::new();

        // Act
        let blue = parser.parse(&access_line(200, "-", "172.18.0.5:8081"));
        let green = parser.parse(&access_line(200, "-", "172.18.0.6:8082"));

        // Assert
        assert_eq!(blue.expect("parse").pool.as_deref(), Some("blue"));
        assert_eq!(green.expect("parse").pool.as_deref(), Some("green"));
    }

    #[test]
    fn should_infer_pool_from_service_name() {
        // Arrange
        let parser = LineParser::new();

        // Act
        let record = parser.parse(&access_line(502, "-", "green_app:3000"));

        // Assert
        assert_eq!(record.expect("parse").pool.as_deref(), Some("green"));
    }

    #[test]
    fn should_leave_pool_unset_when_inference_fails() {
        // Arrange
        let parser = LineParser::new();

        // Act
        let no_addr = parser.parse(&access_line(200, "-", "-"));
        let unknown_addr = parser.parse(&access_line(200, "-", "10.0.0.9:9000"));

        // Assert
        let no_addr = no_addr.expect("parse");
        assert_eq!(no_addr.pool, None);
        assert_eq!(no_addr.upstream_addr, None);
        assert_eq!(unknown_addr.expect("parse").pool, None);
    }

    #[test]
    fn should_parse_error_statuses() {
        // Arrange
        let parser = LineParser::new();

        // Act
        let record = parser.parse(&access_line(503, "green", "172.18.0.6:8082"));

        // Assert
        assert_eq!(record.expect("parse").status, 503);
    }
}
