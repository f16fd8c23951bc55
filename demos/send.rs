use mailgun_adapter::{Mailgun, Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(domain), Some(api_key), Some(recipient)) = (args.next(), args.next(), args.next())
    else {
        eprintln!("usage: send <domain> <api-key> <recipient>");
        std::process::exit(2);
    };

    // test mode stays on: mailgun accepts the message without delivering it
    let mailgun = Mailgun::builder(&domain, api_key).build()?;
    println!("Posting to {}", mailgun.endpoint());

    let message = Message::new(format!("no-reply@{domain}"), "mailgun-adapter demo")
        .with_to(recipient)
        .with_text("please disregard")
        .with_html("<p>please disregard</p>");

    match mailgun.send(&message).await {
        Ok(()) => println!("Accepted"),
        Err(err) => {
            println!("Failed: {err}");
            if let mailgun_adapter::Error::Api { body, .. } = &err {
                println!("{body}");
            }
        }
    }

    Ok(())
}
