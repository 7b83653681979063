pub const HOST: &str = "localhost";
pub const PORT: u16 = 1883;
pub const CLIENT_ID: &str = "pdp11";
pub const TOPIC: &str = "pdp11/cpu_usage";
pub const VALUE: &str = "42.5%";
pub const KEEP_ALIVE: u16 = 60;
