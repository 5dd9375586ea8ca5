use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use travels_map::config::MapConfig;
use travels_map::modal::ModalContent;
use travels_map::theme::{CssVariables, DefaultTheme, ThemeSource};
use travels_map::{ColorScheme, Source, SvgSurface, TravelsMap, TravelsPayload, logging, loader};

#[derive(Parser)]
#[command(name = "travels-map", version, about = "Render a sketch-style map of the countries you have visited")]
struct Args {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the map as SVG
    Render {
        /// Travel payload: a JSON file or an HTML page embedding it
        #[arg(short, long)]
        data: PathBuf,

        /// Numeric-id to alpha-3 mapping (URL or path)
        #[arg(long)]
        mapping: Option<String>,

        /// World TopoJSON (URL or path)
        #[arg(long)]
        topology: Option<String>,

        /// Map width in pixels
        #[arg(short = 'W', long)]
        width: Option<f64>,

        /// Map height in pixels
        #[arg(short = 'H', long)]
        height: Option<f64>,

        #[arg(long, value_enum)]
        scheme: Option<ColorScheme>,

        /// Stylesheet to read --background-accented, --box-border, --link, --link-hover from
        #[arg(long)]
        theme: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a travel payload
    Check {
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Print the modal markup for one country
    Modal {
        #[arg(short, long)]
        data: PathBuf,

        /// Alpha-3 country code, e.g. "ITA"
        code: String,
    },
}

fn read_payload(path: &Path, element_id: &str) -> anyhow::Result<TravelsPayload> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(TravelsPayload::from_document(&text, element_id)?)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };

    match args.command {
        Command::Render {
            data,
            mapping,
            topology,
            width,
            height,
            scheme,
            theme,
            output,
        } => {
            if let Some(m) = mapping {
                config.mapping = m;
            }
            if let Some(t) = topology {
                config.topology = t;
            }
            if let Some(w) = width {
                config.width = w;
            }
            if let Some(h) = height {
                config.height = h;
            }
            if let Some(s) = scheme {
                config.scheme = s;
            }

            let payload = read_payload(&data, &config.payload_id)?;
            let world = match loader::load_world(
                &Source::parse(&config.mapping),
                &Source::parse(&config.topology),
                &config.topology_object,
            ) {
                Ok(world) => world,
                Err(e) => {
                    // No partial maps: leave the output untouched
                    tracing::error!(error = %e, "could not load world data, no map written");
                    std::process::exit(1);
                }
            };

            let theme: Box<dyn ThemeSource> = match theme {
                Some(path) => {
                    let css = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    Box::new(CssVariables::parse(&css))
                }
                None => Box::new(DefaultTheme),
            };

            let mut surface = SvgSurface::new(config.width, config.height);
            let mut map = TravelsMap::new(
                payload,
                world,
                theme,
                (config.width, config.height),
                config.scheme,
            )
            .with_hachure(config.hachure());
            map.render(&mut surface);

            let svg = surface.to_svg();
            match output {
                Some(path) => {
                    std::fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("Wrote {}", path.display());
                }
                None => print!("{svg}"),
            }
        }
        Command::Check { data } => {
            let payload = read_payload(&data, &config.payload_id)?;
            let home = payload
                .home()
                .map(|(code, c)| format!("{} ({code})", c.name))
                .unwrap_or_else(|| "none".to_string());
            println!("Countries: {}", payload.countries.len());
            println!("Visited:   {}", payload.visited_count());
            println!("Home:      {home}");
            println!("Trips:     {}", payload.trip_count());

            let issues = payload.validate();
            for issue in &issues {
                tracing::warn!("{issue}");
                println!("  ! {issue}");
            }
            if !issues.is_empty() {
                bail!("{} problem(s) in {}", issues.len(), data.display());
            }
        }
        Command::Modal { data, code } => {
            let payload = read_payload(&data, &config.payload_id)?;
            let code = code.to_uppercase();
            let Some(record) = payload.countries.get(&code) else {
                bail!("Unknown country code: {code}");
            };
            print!("{}", ModalContent::for_country(&code, record).to_html());
        }
    }

    Ok(())
}
