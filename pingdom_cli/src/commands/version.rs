const VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_COMMIT: Option<&str> = option_env!("PINGDOM_EXPORTER_GIT_COMMIT");

pub fn execute() {
    for (key, value) in info() {
        println!("{}:\t{}", key, value);
    }
}

fn info() -> [(&'static str, String); 3] {
    [
        ("Version", VERSION.to_string()),
        ("Git commit", GIT_COMMIT.unwrap_or("unknown").to_string()),
        (
            "OS/Arch",
            format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = info();
        assert_eq!(info[0], ("Version", VERSION.to_string()));
        assert_eq!(info[1].0, "Git commit");
        assert!(info[2].1.contains('/'));
    }
}
