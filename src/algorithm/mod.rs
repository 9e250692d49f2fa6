/// Pyramid driver and EM loop orchestration
pub mod executor;
/// PatchMatch nearest-neighbor field
pub mod field;
/// Histogram voting that rebuilds target pixels
pub mod voting;
