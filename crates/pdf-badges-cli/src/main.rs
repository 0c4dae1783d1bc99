use anyhow::Result;
use clap::{Parser, Subcommand};
use pdf_badges::{BadgeError, BadgeFont, BadgeOptions, BadgeRecord, CsvSource, DocumentStats};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "badges",
    about = "Make printable badge PDFs for speakers and attendees of conferences",
    version
)]
struct Cli {
    /// Image file to use as the background of every badge
    #[arg(short = 'b', value_name = "BACKGROUND_IMAGE", global = true)]
    background_image: Option<PathBuf>,

    /// Output PDF file
    #[arg(short = 'o', value_name = "OUTPUT_PDF", global = true)]
    output_pdf: Option<PathBuf>,

    /// TrueType/OpenType font for badge text (default: DejaVu Sans if installed)
    #[arg(long, value_name = "FONT_TTF", global = true)]
    font: Option<PathBuf>,

    /// JSON file with layout options
    #[arg(long, value_name = "OPTIONS_JSON", global = true)]
    config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read user information from a CSV file
    #[command(name = "from_csv")]
    FromCsv {
        /// Input CSV file (columns: name, company, role; no header)
        #[arg(value_name = "INPUT_CSV")]
        input_csv: PathBuf,
    },

    /// Read user information from a MySQL database
    #[cfg(feature = "mysql")]
    #[command(name = "from_mysql")]
    FromMysql {
        /// The database user account
        #[arg(value_name = "DATABASE_USER")]
        db_user: String,

        /// The password for the database
        #[arg(value_name = "DATABASE_PASSWORD")]
        db_password: String,

        /// The host of the database
        #[arg(value_name = "DATABASE_HOST")]
        db_host: String,

        /// The name of the database
        #[arg(value_name = "DATABASE_NAME")]
        db_name: String,

        /// The port that the database server listens on
        #[arg(long = "port", value_name = "DATABASE_PORT", default_value_t = pdf_badges::constants::DEFAULT_MYSQL_PORT)]
        db_port: u16,

        /// Query returning one row per badge (default: conference shop attendees)
        #[arg(long)]
        query: Option<String>,
    },

    /// Take user info directly from the command line
    Direct {
        /// The user's name, as it should appear prominently on the badge
        #[arg(value_name = "USER_NAME")]
        user_name: String,

        /// The nickname/handle of the user
        #[arg(value_name = "NICK")]
        nickname: String,

        /// The type of the pass
        #[arg(value_name = "PASS_TYPE")]
        pass_type: String,
    },
}

fn required<'a>(path: &'a Option<PathBuf>, flag: &str, what: &str) -> Result<&'a Path> {
    path.as_deref()
        .ok_or_else(|| BadgeError::Config(format!("{} is required ({})", what, flag)).into())
}

async fn load_options(config: Option<&Path>) -> Result<BadgeOptions> {
    let options = match config {
        Some(path) => BadgeOptions::load(path).await?,
        None => BadgeOptions::default(),
    };
    options.validate()?;
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let output = required(&cli.output_pdf, "-o", "An output PDF path")?;
    let background = required(&cli.background_image, "-b", "A background image")?;
    let options = load_options(cli.config.as_deref()).await?;
    let font = BadgeFont::resolve(cli.font.as_deref()).await?;

    let stats: DocumentStats = match cli.command {
        Commands::FromCsv { input_csv } => {
            log::info!("Reading badges from {}", input_csv.display());
            pdf_badges::generate_pdf(
                CsvSource::new(input_csv),
                &font,
                background,
                &options,
                output,
            )
            .await?
        }

        #[cfg(feature = "mysql")]
        Commands::FromMysql {
            db_user,
            db_password,
            db_host,
            db_name,
            db_port,
            query,
        } => {
            let mut source =
                pdf_badges::MysqlSource::new(db_user, db_password, db_host, db_name)
                    .with_port(db_port);
            if let Some(query) = query {
                source = source.with_query(query);
            }
            pdf_badges::generate_pdf(source, &font, background, &options, output).await?
        }

        Commands::Direct {
            user_name,
            nickname,
            pass_type,
        } => {
            let records = vec![BadgeRecord::new([user_name, nickname, pass_type])];
            pdf_badges::generate_pdf(records, &font, background, &options, output).await?
        }
    };

    println!(
        "Generated {} badges on {} pages → {}",
        stats.badges,
        stats.pages,
        output.display()
    );

    Ok(())
}
