use graphql_explorer::{ArgumentSession, Client, ClientConfig, Effect, Event, SchemaRegistry};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = env::var("GRAPHQL_EXPLORER_URL").expect("GRAPHQL_EXPLORER_URL is required");
    let request = env::var("GRAPHQL_EXPLORER_REQUEST").unwrap_or_else(|_| "pokemon".to_string());

    let mut config = ClientConfig::new(endpoint);
    if let Ok(token) = env::var("GRAPHQL_EXPLORER_TOKEN") {
        config = config.with_token(token);
    }
    let client = Client::new(config)?;

    let mut registry = SchemaRegistry::new();
    client.load_schema(&mut registry).await?;
    registry.build_tree(2);

    let leaves: Vec<String> = registry
        .node(&[request.as_str()])
        .map(|node| {
            node.children
                .iter()
                .filter(|c| c.is_leaf())
                .map(|c| c.label.clone())
                .collect()
        })
        .unwrap_or_default();
    for leaf in &leaves {
        registry.toggle(&[request.as_str(), leaf.as_str()]);
    }
    let saved = registry.save_request("Demo", &request)?;
    println!("{}", saved.operation);

    // optional arguments only: run straight away and accept
    let mut session = ArgumentSession::new(&registry, &saved.arguments);
    let variables = match session.step(Event::Run) {
        Effect::Confirm(_) => match session.step(Event::Confirm(true)) {
            Effect::Finished(variables) => variables,
            other => return Err(format!("unexpected {other:?}").into()),
        },
        Effect::Incomplete(missing) => {
            return Err(format!("required arguments: {}", missing.join(", ")).into())
        }
        other => return Err(format!("unexpected {other:?}").into()),
    };

    let response = client.execute_saved(&saved, Some(variables)).await?;
    println!("data: {}", response.data.unwrap_or_default());
    Ok(())
}
