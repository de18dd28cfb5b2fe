pub mod call;
pub mod config_cmd;
pub mod doctor;
pub mod gateway;
pub mod serve;
pub mod tools;
