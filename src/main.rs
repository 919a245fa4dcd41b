use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trollify::consent::{ConsentStore, FileConsentStore};
use trollify::catalog;
use trollify::{Editor, Exporter, ImageSlot, Platform, SessionConfig};

#[derive(Parser)]
#[command(name = "trollify", version, about = "Compose mock social media posts and export them as PNG")]
struct Cli {
    /// JSON session config (missing keys use defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where the usage-policy acceptance is remembered
    #[arg(long, global = true, default_value = "trollify-consent.json")]
    consent_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List templates and themes for a platform
    Templates { platform: String },

    /// Record acceptance of the usage policies
    Accept,

    /// Render a post and write it as PNG
    Render(RenderArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    platform: String,

    #[arg(long)]
    template: Option<String>,

    #[arg(long)]
    theme: Option<String>,

    #[arg(long)]
    font: Option<String>,

    /// Field assignment, e.g. `--set displayName="Ada L" --set likes=120`
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    fields: Vec<String>,

    /// Picture upload, e.g. `--image post=cat.jpg --image profile=me.png`
    /// (slots: post, profile, comment-profile)
    #[arg(long = "image", value_name = "SLOT=PATH")]
    images: Vec<String>,

    /// Randomize engagement counters before applying `--set`
    #[arg(long)]
    randomize: bool,

    /// Accept the usage policies for this and future runs
    #[arg(long)]
    accept_policies: bool,

    /// Print the preview outline instead of writing a file
    #[arg(long)]
    dry_run: bool,

    #[arg(long, default_value = ".")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SessionConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    let store = FileConsentStore::new(&cli.consent_file);

    match cli.command {
        Command::Templates { platform } => list_templates(&platform),
        Command::Accept => {
            store.store(true)?;
            println!("Usage policies accepted.");
            Ok(())
        }
        Command::Render(args) => {
            if args.accept_policies {
                store.store(true)?;
            }
            let config = config.with_consent(&store)?;
            render(config, args)
        }
    }
}

fn list_templates(platform: &str) -> anyhow::Result<()> {
    let templates = catalog::templates_for(platform);
    if templates.is_empty() {
        bail!("no templates for platform {:?}", platform);
    }
    for t in templates {
        println!("{:<20} {:<20} {}", t.id, t.display_name, t.kind.id());
    }
    let themes: Vec<_> = catalog::themes_for(platform).iter().map(|t| t.name()).collect();
    println!("themes: {}", themes.join(", "));
    let fonts: Vec<_> = catalog::FONTS.iter().map(|f| f.name()).collect();
    println!("fonts: {}", fonts.join(", "));
    Ok(())
}

fn render(config: SessionConfig, args: RenderArgs) -> anyhow::Result<()> {
    let platform: Platform = args.platform.parse()?;
    let mut editor = Editor::new(config.clone(), platform.id())?;
    if editor.needs_consent() {
        bail!("usage policies not accepted; rerun with --accept-policies (content is for entertainment only)");
    }

    if let Some(t) = &args.template {
        editor.select_template(t)?;
    }
    if let Some(t) = &args.theme {
        editor.set_theme(t)?;
    }
    if let Some(f) = &args.font {
        editor.set_font(f)?;
    }
    if args.randomize {
        editor.randomize_engagement();
    }
    for assignment in &args.fields {
        let (name, value) = assignment
            .split_once('=')
            .with_context(|| format!("expected FIELD=VALUE, got {:?}", assignment))?;
        editor.set_field_by_name(name.trim(), value)?;
    }

    for upload in &args.images {
        let (slot, path) = upload
            .split_once('=')
            .with_context(|| format!("expected SLOT=PATH, got {:?}", upload))?;
        let slot: ImageSlot = slot.trim().parse()?;
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path))?;
        editor
            .set_image(slot, &bytes)
            .with_context(|| format!("decoding {}", path))?;
    }

    let tree = editor.preview().context("nothing to render")?;
    print!("{}", tree.outline());
    if args.dry_run {
        return Ok(());
    }

    let exporter = Exporter::new(&config);
    let file = editor.export(&exporter).context("export failed")?;
    let path = file.save_to(&args.out)?;
    println!("wrote {} ({}x{}, sha256 {})", path.display(), file.width, file.height, file.digest());
    Ok(())
}
