mod clear;
mod filter;
mod gain;
mod info;
mod mod_delay;
mod modulation;
mod silencer;
mod stm;
mod sync;
