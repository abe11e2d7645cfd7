pub mod bins;
pub mod mocks;
pub mod system;
