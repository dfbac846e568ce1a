mod focus;
mod gain;
