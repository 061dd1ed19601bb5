use action_nonce::{NonceEngine, StaticContext, Verification};
use std::collections::HashMap;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Host-supplied identity and site salt
    let context = Arc::new(StaticContext::new(9999, "session-token", "site-salt"));
    let engine = NonceEngine::builder(context.clone()).build()?;

    // Embed the token in a form or link
    let token = engine.create_token("delete-post_42");
    println!("Generated token: {token}");

    // Verify it when the form comes back
    match engine.verify_token(token.as_str(), "delete-post_42") {
        Verification::Fresh => println!("✅ Token is fresh"),
        Verification::Stale => println!("✅ Token is valid but about to expire"),
        Verification::Invalid => println!("❌ This should not happen"),
    }

    // A token for one action does not authorize another
    let outcome = engine.verify_token(token.as_str(), "delete-post_43");
    println!("Different action: {outcome:?}");

    // Request helper: pull the token out of submitted parameters
    let mut params = HashMap::new();
    params.insert("_wpnonce".to_string(), token.to_string());
    println!(
        "Admin request check: {:?}",
        engine.check_admin_request(&params, "delete-post_42", None)
    );

    // Another user cannot replay the token
    context.set_user_id(7777);
    match engine.check_admin_request(&params, "delete-post_42", None) {
        Ok(outcome) => println!("❌ Unexpectedly accepted: {outcome:?}"),
        Err(e) => println!("✅ Correctly rejected token for another user: {e}"),
    }

    Ok(())
}
