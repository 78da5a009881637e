use anyhow::Result;
use archinara_pm::config::DEV_SESSION_SECRET;
use archinara_pm::services::auth::{Role, SessionGrant, SessionService, SessionSettings};
use clap::Parser;

/// Mint a signed session cookie for local testing of the access gate.
///
/// Outputs:
/// - the session token (HS256 JWT)
/// - a `Cookie:` header for curl
/// - the matching `Set-Cookie:` value
#[derive(Parser, Debug)]
#[command(name = "session-gen", version, about)]
struct Args {
    /// Session subject (user id)
    #[arg(long)]
    subject: String,

    /// ADMIN, MANAGER, ARCHITECT or USER (case-sensitive)
    #[arg(long, default_value = "USER")]
    role: Role,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// Must match the server's SESSION_SECRET
    #[arg(long, env = "SESSION_SECRET", default_value = DEV_SESSION_SECRET, hide_env_values = true)]
    secret: String,

    #[arg(long, default_value_t = 3600)]
    ttl_seconds: u64,

    /// Use the `__Secure-` cookie name (production servers)
    #[arg(long, default_value_t = false)]
    secure: bool,

    /// Print only the token
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let sessions = SessionService::new(&SessionSettings {
        secret: args.secret,
        ttl_seconds: args.ttl_seconds,
        leeway_seconds: 0,
        secure_cookie: args.secure,
    });

    let grant = SessionGrant {
        subject: args.subject,
        role: args.role,
        name: args.name,
        email: args.email,
    };
    let token = sessions.issue(&grant)?;

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("token: {}", token);
    println!("Cookie: {}={}", sessions.cookie_name(), token);
    println!("Set-Cookie: {}", sessions.set_cookie(&token));
    println!("role: {}", grant.role);
    println!("expires in: {}s", sessions.ttl_seconds());

    Ok(())
}
