const SWARM_CARGO_FEATURES: &str = env!("SWARM_CARGO_FEATURES");
const SWARM_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn startup_message() -> String {
    let cargo_features = if SWARM_CARGO_FEATURES.is_empty() {
        "none"
    } else {
        SWARM_CARGO_FEATURES
    };
    format!(
        "
  ___ __      __  _    ___ __  __
 / __|\\ \\    / / /_\\  | _ \\  \\/  |
 \\__ \\ \\ \\/\\/ / / _ \\ |   / |\\/| |
 |___/  \\_/\\_/ /_/ \\_\\|_|_\\_|  |_|

 Version          : {SWARM_VERSION}
 Build Platform   : {}-{}
 Cargo Features   : {cargo_features}
",
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}
