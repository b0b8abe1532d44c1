mod cli;

use anyhow::Context;
use anyhow::Result;
use channel_select::CdevFacility;
use channel_select::ChannelControl;
use channel_select::ChannelStates;
use channel_select::HardwareFacility;
use clap::Parser;
use cli::Action;
use cli::Args;
use log::debug;

#[cfg(feature = "wave8ch-lib")]
use channel_select::FfiFacility;

type Facility = Box<dyn HardwareFacility + Send>;

#[cfg(not(feature = "wave8ch-lib"))]
fn open_facility(args: &Args) -> Facility {
    Box::new(CdevFacility::new(args.cdev_config()))
}

#[cfg(feature = "wave8ch-lib")]
fn open_facility(args: &Args) -> Facility {
    match args.use_lib {
        true => Box::new(FfiFacility::new()),
        false => Box::new(CdevFacility::new(args.cdev_config())),
    }
}

fn init_logging(args: &Args) -> Result<()> {
    stderrlog::new()
        .module(module_path!())
        .quiet(args.quiet)
        .verbosity(1 + usize::from(args.verbose))
        .init()
        .context("Failed to initialize logging")
}

fn run(args: &Args) -> Result<ChannelStates> {
    let ctl = ChannelControl::with_inverted_outputs(open_facility(args), args.invert);

    let channels = args.channels();
    if args.list_all || channels.is_empty() {
        debug!("Listing all channels");
        return ctl
            .get_all_channel_states()
            .context("Failed to read channel states");
    }

    let action = args.action();
    let mut states = Vec::with_capacity(channels.len());
    for channel in channels {
        match action {
            Action::Enable => ctl
                .set_channel_state(channel, true)
                .with_context(|| format!("Failed to enable {}", channel))?,
            Action::Disable => ctl
                .set_channel_state(channel, false)
                .with_context(|| format!("Failed to disable {}", channel))?,
            Action::Read => {}
        }
        let state = ctl
            .get_channel_state(channel)
            .with_context(|| format!("Failed to read {}", channel))?;
        states.push((channel, state));
    }
    Ok(states.into_iter().collect())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let states = run(&args)?;
    println!("{}", cli::render(&states, args.json_out)?);
    Ok(())
}
