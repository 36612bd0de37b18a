// Core math shared by the engine and game layers

pub mod math;
