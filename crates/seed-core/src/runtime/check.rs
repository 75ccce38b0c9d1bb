//! Detection of the tools dependency installation relies on

use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    fn probe(name: &'static str, program: &str) -> Self {
        let output = Command::new(program).arg("--version").output();

        match output {
            Ok(out) if out.status.success() => {
                let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
                RuntimeInfo {
                    name,
                    version: Some(version),
                    available: true,
                }
            }
            _ => RuntimeInfo {
                name,
                version: None,
                available: false,
            },
        }
    }
}

/// Check if Bower is available
pub fn check_bower() -> RuntimeInfo {
    RuntimeInfo::probe("Bower", "bower")
}

/// Check if Node.js is available (Bower runs on it)
pub fn check_node() -> RuntimeInfo {
    RuntimeInfo::probe("Node.js", "node")
}
