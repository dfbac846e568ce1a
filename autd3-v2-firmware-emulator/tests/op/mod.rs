mod filter;
mod flags;
mod info;
mod mod_delay;
mod modulation;
mod silencer;
mod stm;
mod sync;
