pub mod cooldown_sweep;
