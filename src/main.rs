use std::{path::PathBuf, process::ExitCode};

use clap::{Arg, ArgMatches, Command};
use rand::{SeedableRng, rngs::StdRng};
use rgbplot::{
  LegendPosition, Plot, Result, Style,
  dataset::{self, ColumnListing, DEFAULT_PATH},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

fn cli() -> Command {
  let file = Arg::new("file")
    .short('f')
    .long("file")
    .help("CSV file with red, green and blue columns")
    .value_parser(clap::value_parser!(PathBuf))
    .default_value(DEFAULT_PATH);
  let output = Arg::new("output")
    .short('o')
    .long("output")
    .help("Write a PNG instead of opening a window")
    .value_parser(clap::value_parser!(PathBuf));

  Command::new("rgbplot")
    .version(option_env!("CARGO_PKG_VERSION").unwrap_or(""))
    .about("Generate, print and plot a small random RGB dataset")
    .subcommand_required(true)
    .arg(
      Arg::new("log")
        .long("log")
        .global(true)
        .help("Log filter, overriding RUST_LOG (example: 'rgbplot=debug')"),
    )
    .subcommand(
      Command::new("sample")
        .about("Write random RGB rows to a CSV file")
        .arg(file.clone())
        .arg(
          Arg::new("rows")
            .short('n')
            .long("rows")
            .help("Number of rows")
            .value_parser(clap::value_parser!(usize))
            .default_value("10"),
        )
        .arg(
          Arg::new("seed")
            .long("seed")
            .help("Seed for reproducible output")
            .value_parser(clap::value_parser!(u64)),
        ),
    )
    .subcommand(
      Command::new("print").about("Print one column of the CSV file").arg(file.clone()).arg(
        Arg::new("column")
          .short('c')
          .long("column")
          .help("Column to print")
          .value_parser(dataset::COLUMNS)
          .default_value("red"),
      ),
    )
    .subcommand(
      Command::new("lines")
        .about("Plot each column as a line, with a legend beside the axes")
        .arg(file.clone())
        .arg(output.clone()),
    )
    .subcommand(
      Command::new("markers")
        .about("Plot each column as a line and as markers, in its own colour")
        .arg(file)
        .arg(output),
    )
}

fn init_logging(filter: Option<&String>) {
  let env = match filter {
    Some(filter) => EnvFilter::new(filter),
    None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
  };
  fmt::Subscriber::builder().with_env_filter(env).with_writer(std::io::stderr).init();
}

fn main() -> ExitCode {
  let matches = cli().get_matches();
  init_logging(matches.get_one::<String>("log"));

  match run(&matches) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{e}");
      ExitCode::FAILURE
    }
  }
}

fn run(matches: &ArgMatches) -> Result<()> {
  match matches.subcommand() {
    Some(("sample", args)) => sample(args),
    Some(("print", args)) => print(args),
    Some(("lines", args)) => lines(args),
    Some(("markers", args)) => markers(args),
    _ => unreachable!("subcommand is required"),
  }
}

// clap fills in defaults, so these arguments are always present.
fn file_arg(args: &ArgMatches) -> PathBuf {
  args.get_one::<PathBuf>("file").cloned().expect("--file has a default")
}

fn rows_arg(args: &ArgMatches) -> usize {
  args.get_one::<usize>("rows").copied().expect("--rows has a default")
}

fn sample(args: &ArgMatches) -> Result<()> {
  let path = file_arg(args);
  let rows = rows_arg(args);

  let rows = match args.get_one::<u64>("seed") {
    Some(&seed) => dataset::generate(&mut StdRng::seed_from_u64(seed), rows),
    None => dataset::generate(&mut rand::rng(), rows),
  };
  dataset::write_csv_file(&path, &rows)
}

fn print(args: &ArgMatches) -> Result<()> {
  let df = dataset::read_csv(file_arg(args))?;
  let name = args.get_one::<String>("column").expect("--column has a default");

  let listing = ColumnListing::new(df.column(name)?)?;
  println!("{listing}");
  Ok(())
}

fn lines(args: &ArgMatches) -> Result<()> {
  let df = dataset::read_csv(file_arg(args))?;

  let mut plot = Plot::new();
  plot.style(Style::DARKGRID).legend(LegendPosition::Outside);
  for column in df.get_columns() {
    plot.line_indexed(column);
  }

  finish(&plot, args)
}

fn markers(args: &ArgMatches) -> Result<()> {
  let df = dataset::read_csv(file_arg(args))?;
  let (red, green, blue) = (df.column("red")?, df.column("green")?, df.column("blue")?);

  let mut plot = Plot::new();
  plot.style(Style::DARKGRID);
  plot.plot_fmt(red, "r-")?.plot_fmt(green, "g-")?.plot_fmt(blue, "b-")?;
  plot.plot_fmt(red, "ro")?.plot_fmt(green, "go")?.plot_fmt(blue, "bo")?;

  finish(&plot, args)
}

fn finish(plot: &Plot, args: &ArgMatches) -> Result<()> {
  match args.get_one::<PathBuf>("output") {
    Some(path) => plot.save(path),
    None => {
      info!("showing plot, press q to close");
      plot.show()
    }
  }
}
