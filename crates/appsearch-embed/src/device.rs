//! Compute device for the sentence model, chosen by `embedding.device`.

use anyhow::{bail, Result};
use candle_core::Device;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePreference {
    /// Metal when compiled in and available, else CPU.
    Auto,
    Cpu,
    Metal,
}

impl DevicePreference {
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "metal" | "mps" => Ok(Self::Metal),
            other => bail!("unknown embedding device '{other}' (expected auto, cpu or metal)"),
        }
    }
}

/// An explicit `Metal` request fails when the backend is missing; `Auto`
/// falls back to CPU.
pub fn resolve_device(pref: DevicePreference) -> Result<Device> {
    let device = match pref {
        DevicePreference::Cpu => Device::Cpu,
        DevicePreference::Metal => metal()?,
        DevicePreference::Auto => metal().unwrap_or_else(|e| {
            warn!(error = %e, "metal unavailable, embedding on CPU");
            Device::Cpu
        }),
    };
    info!(?pref, metal = device.is_metal(), "embedding device selected");
    Ok(device)
}

#[cfg(feature = "metal")]
fn metal() -> Result<Device> {
    Ok(Device::new_metal(0)?)
}

#[cfg(not(feature = "metal"))]
fn metal() -> Result<Device> {
    bail!("built without the `metal` feature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!(DevicePreference::parse("CPU").unwrap(), DevicePreference::Cpu);
        assert_eq!(DevicePreference::parse("mps").unwrap(), DevicePreference::Metal);
        assert_eq!(DevicePreference::parse("").unwrap(), DevicePreference::Auto);
        assert!(DevicePreference::parse("cuda").is_err());
    }

    #[test]
    fn cpu_and_auto_always_resolve() {
        assert!(resolve_device(DevicePreference::Cpu).unwrap().is_cpu());
        assert!(resolve_device(DevicePreference::Auto).is_ok());
    }

    #[cfg(not(feature = "metal"))]
    #[test]
    fn explicit_metal_without_backend_fails() {
        assert!(resolve_device(DevicePreference::Metal).is_err());
    }
}
