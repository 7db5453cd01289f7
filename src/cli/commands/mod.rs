mod init;
mod lookup;
mod migrate;

pub use init::cmd_init;
pub use lookup::cmd_lookup;
pub use migrate::cmd_migrate;
