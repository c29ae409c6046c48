use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::LevelFilter;

use crate::{
    error::Result, initialize, lattice::LatticeLayout, simulation_parameters::SimulationParams, write_summary,
    write_summary_file,
};

const CARGO_PKG_AUTHORS: &'static str = env!("CARGO_PKG_AUTHORS");
const CARGO_PKG_VERSION: &'static str = env!("CARGO_PKG_VERSION");
const CARGO_PKG_DESCRIPTION: &'static str = env!("CARGO_PKG_DESCRIPTION");

pub fn start() {
    let matches = App::new("Granular Impact")
        .version(CARGO_PKG_VERSION)
        .author(CARGO_PKG_AUTHORS)
        .about(CARGO_PKG_DESCRIPTION)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            SubCommand::with_name("init")
                .about("Build the initial state for the given config and report its layout")
                .arg(
                    Arg::with_name("SIMULATION_CONFIG")
                        .help("Sets the simulation paramaters")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("OVERWRITE_CONFIG_FILE")
                        .long("overwrite-config-file")
                        .short("c")
                        .required(false)
                        .takes_value(true)
                        .help("Overwrite single parameters of the config"),
                )
                .arg(
                    Arg::with_name("SUMMARY_PATH")
                        .long("summary-path")
                        .short("w")
                        .required(false)
                        .takes_value(true)
                        .help("Where to write the summary to"),
                ),
        )
        .subcommand(
            SubCommand::with_name("layout")
                .about("Print the lattice sizing for the given config without allocating anything")
                .arg(
                    Arg::with_name("SIMULATION_CONFIG")
                        .help("Sets the simulation paramaters")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    let level = match matches.occurrences_of("v") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = if let Some(init_matches) = matches.subcommand_matches("init") {
        init_main(init_matches)
    } else if let Some(layout_matches) = matches.subcommand_matches("layout") {
        layout_main(layout_matches)
    } else {
        unreachable!()
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_params(matches: &ArgMatches) -> Result<SimulationParams> {
    // required argument, enforced by clap
    let parameter_file = matches.value_of("SIMULATION_CONFIG").unwrap_or_default();

    let simulation_params = match matches.value_of("OVERWRITE_CONFIG_FILE") {
        Some(overwrite_file) => SimulationParams::load_with_overrides(parameter_file, overwrite_file)?,
        None => SimulationParams::load(parameter_file)?,
    };
    log::debug!("{:?}", simulation_params);

    Ok(simulation_params)
}

fn init_main(matches: &ArgMatches) -> Result<()> {
    let simulation_params = load_params(matches)?;
    let simulation = initialize(&simulation_params)?;

    let s = match matches.value_of("SUMMARY_PATH") {
        Some(summary_path) => write_summary_file(&simulation, &simulation_params, summary_path)?,
        None => write_summary(&simulation, &simulation_params),
    };
    print!("{}", s);

    Ok(())
}

fn layout_main(matches: &ArgMatches) -> Result<()> {
    let simulation_params = load_params(matches)?;
    simulation_params.validate()?;
    let layout = LatticeLayout::from_params(&simulation_params)?;

    println!("max_in_x: {}", layout.max_in_x());
    println!("max_in_y: {}", layout.max_in_y());
    println!("num_particles: {}", layout.num_particles());
    println!("num_contacts: {}", layout.num_contacts());
    println!("num_pair_forces: {}", layout.num_pair_forces());

    Ok(())
}
