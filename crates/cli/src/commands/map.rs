use std::{
    io::{BufRead, Write},
    path::Path,
};

use anyhow::Context;
use redat::{
    api::ApiClient,
    config::Config,
    feedback::{AUTO_CLOSE_DELAY, FeedbackFlow, FormspreeClient, Step},
    map::{MapView, leaflet},
    model::RouteData,
    routing::RoutingClient,
};
use tracing::info;

pub async fn map(
    config: &Config,
    from: &str,
    to: &str,
    out: &Path,
    ask_feedback: bool,
) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config)?;
    let view = client.fare_view(from, to).await?;
    info!("Loaded {} stations", view.stations.len());

    print!("{}", view.route.fare_card());

    let mut map = MapView::new();
    map.mount();
    map.render_route(&view.route, &RoutingClient::new()).await;
    if let Some(canvas) = map.canvas() {
        let page = leaflet::render_page(canvas);
        std::fs::write(out, page).with_context(|| format!("writing {}", out.display()))?;
        println!("Route map written to {}", out.display());
    }
    map.close();

    if ask_feedback {
        run_feedback(&view.route).await?;
    }
    Ok(())
}

/// The price accuracy dialog, driven over stdin. A closed stdin cancels
/// the dialog at whichever question it reaches, like dismissing it.
async fn run_feedback(route: &RouteData) -> anyhow::Result<()> {
    let mut flow = FeedbackFlow::for_route(route);
    let client = FormspreeClient::new();

    let Some(accurate) = ask_yes_no("Was the price information accurate? [y/n] ")? else {
        flow.close();
        return Ok(());
    };
    flow.answer(accurate);

    while flow.step() == Step::Feedback {
        let Some(reason) = prompt("Please tell us why the price was not accurate: ")? else {
            break;
        };
        flow.set_feedback(reason);
        if !flow.can_submit() {
            // Blank reasons cannot be sent.
            continue;
        }
        if !flow.submit(&client).await {
            if let Some(error) = flow.error() {
                println!("{error}");
            }
            if ask_yes_no("Try again? [y/n] ")? != Some(true) {
                break;
            }
        }
    }

    if flow.step() == Step::Thanks {
        println!("Thank you for your feedback!");
        tokio::time::sleep(AUTO_CLOSE_DELAY).await;
    }
    flow.close();
    Ok(())
}

fn ask_yes_no(question: &str) -> std::io::Result<Option<bool>> {
    let Some(answer) = prompt(question)? else {
        return Ok(None);
    };
    Ok(Some(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")))
}

/// Reads one answer, `None` once stdin is closed.
fn prompt(question: &str) -> std::io::Result<Option<String>> {
    print!("{question}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
