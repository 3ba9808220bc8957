//! Command-line arguments.

use clap::Parser;

const DEFAULT_PORT: u16 = 12345;

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "tsudoi-client", version, about = "Tsudoi chat client")]
pub struct ClientArgs {
    /// Server host
    #[arg(long, env = "TSUDOI_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server chat port
    #[arg(short, long, env = "TSUDOI_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Username to join with; asked for by the server when omitted
    #[arg(short, long)]
    pub username: Option<String>,
}

impl ClientArgs {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしの場合はローカルの既定ポートに接続する
        // when (操作):
        let args = ClientArgs::try_parse_from(["tsudoi-client"]).unwrap();

        // then (期待する結果):
        assert_eq!(args.addr(), "127.0.0.1:12345");
        assert_eq!(args.username, None);
    }

    #[test]
    fn test_explicit_args() {
        // テスト項目: ホスト・ポート・ユーザー名を指定できる
        // when (操作):
        let args = ClientArgs::try_parse_from([
            "tsudoi-client",
            "--host",
            "chat.local",
            "-p",
            "4000",
            "-u",
            "alice",
        ])
        .unwrap();

        // then (期待する結果):
        assert_eq!(args.addr(), "chat.local:4000");
        assert_eq!(args.username.as_deref(), Some("alice"));
    }
}
