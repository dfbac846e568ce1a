pub mod autd3_device;
pub mod cpu;
pub mod defined;
pub mod error;
pub mod ethercat;
pub mod firmware;
pub mod fpga;
pub mod geometry;
pub mod link;
pub mod operation;
pub mod transmission;
