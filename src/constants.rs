#[macro_export]
macro_rules! env_lazy {
    ($( $vis:vis $name:ident : $ty:ty = ($key:literal, $default:expr); )* ) => {
        $(
            $vis static $name: ::std::sync::LazyLock<$ty> = ::std::sync::LazyLock::new(|| {
                $crate::libs::config::load_env();
                $crate::libs::config::Config::get_var_t::<$ty>($key, $default)
            });
        )*
    };
}

env_lazy! {
    pub RPC_TIMEOUT_SECS: u64 = ("RPC_TIMEOUT_SECS", 30);
}

/// Local test chains (anvil, hardhat, ganache) all serve here by default.
pub const DEFAULT_NODE_URL: &str = "http://localhost:8545";

/// Intrinsic gas of a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;
