use anyhow::Result;
use sasrelay::event_hubs::{connect, Config, Message};
use sasrelay::{default_context, time};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    // Reads EH_PROXY_DNS, SB_NAMESPACE, SB_KEYNAME, SB_KEYVAL and friends.
    let config = Config::default().from_env(&default_context())?;
    let client = connect(&config).await?;

    let msg = Message::random(time::now());
    println!("sending {}", msg.id);

    let resp = client.send(msg.to_json()?).await?;
    println!("{}", resp.status_code());
    println!("{}", String::from_utf8_lossy(resp.body()));

    Ok(())
}
