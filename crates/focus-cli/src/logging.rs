use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_DIRECTIVES: [&str; 2] = ["focus_core=debug", "focus_cli=debug"];

/// Log to stderr so stdout stays clean for tables and JSON.
pub fn init(verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(build_filter(env.as_deref(), verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// `RUST_LOG` (or `warn`) as the base; `-v` adds debug for our crates on top.
fn build_filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    let base = if verbose { "info" } else { "warn" };
    let mut filter = env
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(base));

    if verbose {
        for directive in VERBOSE_DIRECTIVES {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}
