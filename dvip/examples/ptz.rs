use clap::{Parser, Subcommand};
use dvip::{
    protocol::{
        command::{Focus, OsdButton, PanTiltDirection, TallyColour},
        LengthMode, DEFAULT_PORT,
    },
    ConnectionState, DvipConfig, DvipController, Result,
};
use std::time::Duration;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

/// PTZ camera control over DVIP.
#[derive(Debug, Parser)]
#[clap(verbatim_doc_comment)]
struct CliParser {
    /// IP address or host name of the camera.
    #[clap(short, long)]
    pub ip: String,

    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// VISCA device address.
    #[clap(short, long, default_value_t = 1)]
    pub address: u8,

    /// What the length field counts.
    #[clap(long, value_enum, default_value_t = LengthMode::Body)]
    pub length_mode: LengthMode,

    /// Pan/tilt speed id, in hex.
    #[clap(long, value_parser = parse_hex_u8, default_value = "0C")]
    pub speed: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drive in a direction for a while, then stop.
    Move {
        #[clap(value_enum)]
        direction: PanTiltDirection,

        /// How long to move for, in milliseconds.
        #[clap(long, default_value_t = 500)]
        ms: u64,
    },

    Home,

    /// Zoom in (or out) for a while, then stop.
    Zoom {
        #[clap(long)]
        out: bool,

        /// How long to zoom for, in milliseconds.
        #[clap(long, default_value_t = 1000)]
        ms: u64,
    },

    Focus {
        #[clap(value_enum)]
        focus: Focus,
    },

    /// Recall a preset.
    Recall { slot: u8 },

    /// Store the current position as a preset.
    Save { slot: u8 },

    Tally {
        #[clap(value_enum)]
        colour: TallyColour,
    },

    Osd {
        #[clap(value_enum)]
        button: OsdButton,
    },

    /// Send a raw command, given in hex (eg: "81 01 04 00 02 FF").
    Custom { hex: String },

    /// Poll the camera, logging anything it sends.
    Watch {
        /// How long to watch for, in seconds.
        #[clap(long, default_value_t = 10)]
        secs: u64,
    },
}

fn parse_hex_u8(s: &str) -> std::result::Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(s.trim_start_matches("0x"), 16)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .compact()
        .init();
    let opts = CliParser::parse();

    let config = DvipConfig {
        port: opts.port,
        device_address: opts.address,
        length_mode: opts.length_mode,
        pan_tilt_speed: opts.speed,
        poll: matches!(opts.command, Command::Watch { .. }),
        ..DvipConfig::new(opts.ip)
    };
    let camera = DvipController::new(config).await?;
    if camera.get_state().await.connection != ConnectionState::Connected {
        error!("could not connect to camera");
        return Ok(());
    }

    match opts.command {
        Command::Move { direction, ms } => {
            camera.pan_tilt(direction).await?;
            tokio::time::sleep(Duration::from_millis(ms)).await;
            camera.pan_tilt(PanTiltDirection::Stop).await?;
        }

        Command::Home => camera.home().await?,

        Command::Zoom { out, ms } => {
            let ms = Duration::from_millis(ms);
            if out {
                camera.zoom_out_for(ms).await?;
            } else {
                camera.zoom_in_for(ms).await?;
            }

            // Let the timed stop go out before disconnecting.
            tokio::time::sleep(ms + Duration::from_millis(100)).await;
        }

        Command::Focus { focus } => camera.focus(focus).await?,
        Command::Recall { slot } => camera.recall_preset(slot).await?,
        Command::Save { slot } => camera.save_preset(slot).await?,
        Command::Tally { colour } => camera.set_tally(colour).await?,
        Command::Osd { button } => camera.osd(button).await?,
        Command::Custom { hex } => camera.custom(&hex).await?,

        Command::Watch { secs } => {
            let mut events = camera.state_update_events();
            let _ = tokio::time::timeout(Duration::from_secs(secs), async {
                while let Ok((state, update)) = events.recv().await {
                    info!("{update:?}: {:?}", *state);
                }
            })
            .await;
        }
    }

    info!("done");
    camera.destroy().await?;
    Ok(())
}
