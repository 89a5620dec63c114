//! Run-time configuration for the driver.
//!
//! The command line carries only the expression, so the output architecture
//! comes from the `R9CC_TARGET` environment variable and defaults to the host.

use std::fmt;
use std::str::FromStr;

use snafu::Snafu;

/// Environment variable selecting the output architecture.
pub const TARGET_ENV: &str = "R9CC_TARGET";

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ConfigError {
  #[snafu(display("unknown target \"{name}\" (expected aarch64 or x86_64)"))]
  UnknownTarget { name: String },

  #[snafu(display("R9CC_TARGET is not valid unicode"))]
  NotUnicode,
}

/// Instruction set the code generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  Aarch64,
  X86_64,
}

impl Target {
  /// The machine we are running on, when it is one we can emit for.
  pub fn host() -> Self {
    if cfg!(target_arch = "x86_64") {
      Self::X86_64
    } else {
      Self::Aarch64
    }
  }
}

impl Default for Target {
  fn default() -> Self {
    Self::host()
  }
}

impl FromStr for Target {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "aarch64" | "arm64" => Ok(Self::Aarch64),
      "x86_64" | "x86-64" | "amd64" => Ok(Self::X86_64),
      _ => UnknownTargetSnafu { name: s }.fail(),
    }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Aarch64 => f.write_str("aarch64"),
      Self::X86_64 => f.write_str("x86_64"),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
  pub target: Target,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_var(std::env::var(TARGET_ENV))
  }

  fn from_var(var: Result<String, std::env::VarError>) -> Result<Self, ConfigError> {
    let target = match var {
      Ok(name) if name.trim().is_empty() => Target::host(),
      Ok(name) => name.parse()?,
      Err(std::env::VarError::NotPresent) => Target::host(),
      Err(std::env::VarError::NotUnicode(_)) => return NotUnicodeSnafu.fail(),
    };
    Ok(Self { target })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::env::VarError;

  #[test]
  fn parses_target_spellings() {
    assert_eq!("aarch64".parse(), Ok(Target::Aarch64));
    assert_eq!("ARM64".parse(), Ok(Target::Aarch64));
    assert_eq!("x86-64".parse(), Ok(Target::X86_64));
    assert_eq!(" amd64 ".parse(), Ok(Target::X86_64));
  }

  #[test]
  fn rejects_unknown_target() {
    let err = "riscv64".parse::<Target>().unwrap_err();
    assert_eq!(
      err.to_string(),
      "unknown target \"riscv64\" (expected aarch64 or x86_64)"
    );
  }

  #[test]
  fn display_round_trips() {
    for target in [Target::Aarch64, Target::X86_64] {
      assert_eq!(target.to_string().parse(), Ok(target));
    }
  }

  #[test]
  fn unset_or_blank_means_host() {
    assert_eq!(
      Config::from_var(Err(VarError::NotPresent)),
      Ok(Config { target: Target::host() })
    );
    assert_eq!(Config::from_var(Ok(String::new())), Ok(Config::default()));
  }

  #[test]
  fn explicit_target_wins() {
    let config = Config::from_var(Ok("x86_64".to_string())).unwrap();
    assert_eq!(config.target, Target::X86_64);
  }
}
