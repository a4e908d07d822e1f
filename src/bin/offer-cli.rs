use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "offer-cli")]
#[command(about = "Command-line client for the cart offer service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9001")]
    url: String,

    /// Admin API key, needed for `status` and `offers`.
    #[arg(short, long, env = "CART_OFFERS_ADMIN_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an offer
    AddOffer {
        #[arg(long)]
        restaurant_id: i64,
        /// FLATX or PERCENTAGE
        #[arg(long)]
        offer_type: String,
        #[arg(long, allow_negative_numbers = true)]
        offer_value: i64,
        /// Target segments, e.g. --segment p1 --segment p2
        #[arg(long = "segment")]
        segments: Vec<String>,
    },
    /// Compute the cart value for a user
    Apply {
        #[arg(long)]
        restaurant_id: i64,
        #[arg(long, allow_negative_numbers = true)]
        cart_value: i64,
        #[arg(long, allow_negative_numbers = true)]
        user_id: i64,
    },
    /// Look up a user's segment
    Segment {
        #[arg(long, allow_negative_numbers = true)]
        user_id: i64,
    },
    /// Show service status (admin)
    Status,
    /// List registered offers in match order (admin)
    Offers,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut admin_headers = HeaderMap::new();
    if !cli.key.is_empty() {
        admin_headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
        );
    }

    let res = match cli.command {
        Commands::AddOffer {
            restaurant_id,
            offer_type,
            offer_value,
            segments,
        } => {
            client
                .post(format!("{}/api/v1/offer", cli.url))
                .json(&json!({
                    "restaurant_id": restaurant_id,
                    "offer_type": offer_type,
                    "offer_value": offer_value,
                    "customer_segments": segments,
                }))
                .send()
                .await?
        }
        Commands::Apply {
            restaurant_id,
            cart_value,
            user_id,
        } => {
            client
                .post(format!("{}/api/v1/cart/apply_offer", cli.url))
                .json(&json!({
                    "cart_value": cart_value,
                    "restaurant_id": restaurant_id,
                    "user_id": user_id,
                }))
                .send()
                .await?
        }
        Commands::Segment { user_id } => {
            client
                .get(format!("{}/api/v1/user_segment", cli.url))
                .query(&[("user_id", user_id)])
                .send()
                .await?
        }
        Commands::Status => {
            client
                .get(format!("{}/admin/status", cli.url))
                .headers(admin_headers)
                .send()
                .await?
        }
        Commands::Offers => {
            client
                .get(format!("{}/admin/offers", cli.url))
                .headers(admin_headers)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
