use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("worlddata {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: worlddata");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("WORLDDATA_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("features: async={}, cli=true", cfg!(feature = "async"));
    println!(
        "protocol: marker=0x{:02x} min_len={} max_len={} max_byte_age={}ms",
        worlddata_frame::MARKER,
        worlddata_frame::MIN_PACKET_LENGTH,
        worlddata_frame::MAX_PACKET_LENGTH,
        worlddata_frame::MAX_BYTE_AGE.as_millis()
    );

    Ok(SUCCESS)
}
