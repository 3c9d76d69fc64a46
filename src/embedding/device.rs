use candle_core::Device;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

/// Picks the inference device for the sentence encoder.
///
/// GPU backends are only tried when compiled in (`metal` / `cuda` features). A GPU
/// that fails to initialise is logged and skipped; the CPU is always available.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Sentence encoder using Metal");
                return device;
            }
            Err(e) => warn!(error = %e, "Metal device unavailable, trying next backend"),
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Sentence encoder using CUDA");
                return device;
            }
            Err(e) => warn!(error = %e, "CUDA device unavailable, trying next backend"),
        }
    }

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    debug!("Built without GPU backends, using CPU");

    Device::Cpu
}

/// Short name for a device, as reported by `/ready`.
pub fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}
