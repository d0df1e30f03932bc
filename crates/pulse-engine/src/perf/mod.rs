pub mod sampler;

pub use sampler::{
    FixedMemory, MemoryProbe, NoMemoryProbe, PerformanceSample, PerformanceSampler, SamplerConfig,
};
