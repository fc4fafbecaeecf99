//! Backend selection for inference.
//!
//! Evaluation is an offline, inference-only workload, so the CPU NdArray
//! backend is the default. A `wgpu` feature swaps in GPU execution.

#[cfg(all(feature = "ndarray", not(feature = "wgpu")))]
pub type DefaultBackend = burn::backend::NdArray<f32>;

#[cfg(feature = "wgpu")]
pub type DefaultBackend = burn::backend::Wgpu;

/// Get the default device for the selected backend
pub fn default_device() -> <DefaultBackend as burn::tensor::backend::Backend>::Device {
    Default::default()
}

/// Get a human-readable name for the current backend
pub fn backend_name() -> &'static str {
    #[cfg(all(feature = "ndarray", not(feature = "wgpu")))]
    {
        "NdArray (CPU)"
    }
    #[cfg(feature = "wgpu")]
    {
        "Wgpu (GPU)"
    }
}
