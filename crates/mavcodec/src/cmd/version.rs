use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("mavcodec {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!("protocol: MAVLink v2 (magic 0x{:02X})", mavcodec_frame::MAGIC);
    println!("max_payload: {}", mavcodec_frame::MAX_PAYLOAD);
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("features: async={}, cli=true", cfg!(feature = "async"));

    Ok(SUCCESS)
}
