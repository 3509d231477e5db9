pub mod barrier;
pub mod neighbors;
pub mod partition;
pub mod safe;

#[path = "unsafe"]
pub mod unsafe_impl {
    pub mod barrier_unsafe;
}
