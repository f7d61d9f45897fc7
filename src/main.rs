use chromiumoxide::browser::{Browser, BrowserConfig};
use clap::Parser;
use color_eyre::Result;
use futures::StreamExt;
use quiz_pager::{
	LabelClassifier,
	config::AppConfig,
	controller::AutoPager,
	discovery::wait_for_element,
	observer::DomObserver,
	surface::{ControlSurface, DomSurface},
};
use v_utils::elog;

#[derive(Debug, Parser)]
#[command(name = "quiz_pager")]
#[command(about = "Injected navigation and auto-advance for the 16Personalities test", long_about = None)]
struct Args {
	/// Run with visible browser window (non-headless mode)
	#[arg(long)]
	visible: bool,

	/// Quiz page to drive
	#[arg(short, long, default_value = "https://www.16personalities.com/free-personality-test")]
	target_url: String,

	/// Progress percentage at which the threshold button stops
	#[arg(long, default_value_t = 80)]
	threshold: u32,

	/// Milliseconds between element-discovery attempts
	#[arg(long, default_value_t = 500)]
	check_interval_ms: u64,

	/// Milliseconds between auto-advance ticks
	#[arg(long, default_value_t = 200)]
	auto_page_interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	let args = Args::parse();

	let config = AppConfig {
		threshold_percent: args.threshold,
		check_interval_ms: args.check_interval_ms,
		auto_page_interval_ms: args.auto_page_interval_ms,
		visible: args.visible,
		..AppConfig::default()
	};

	println!("Starting quiz navigation overlay...");
	println!("Visible mode: {}", config.visible);

	let browser_config = if config.visible {
		BrowserConfig::builder()
			.with_head() // Visible browser with UI
			.build()
			.map_err(|e| color_eyre::eyre::eyre!("Failed to build browser config: {}", e))?
	} else {
		BrowserConfig::builder()
			.build() // Headless mode
			.map_err(|e| color_eyre::eyre::eyre!("Failed to build browser config: {}", e))?
	};

	let (mut browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| color_eyre::eyre::eyre!("Failed to launch browser: {}", e))?;

	// Drain browser events so CDP doesn't stall
	let handle = tokio::spawn(async move {
		while let Some(_event) = handler.next().await {}
	});

	let page = browser.new_page("about:blank").await.map_err(|e| color_eyre::eyre::eyre!("Failed to create new page: {}", e))?;

	// Everything past this point must route back through browser.close()
	let outcome: Result<()> = async {
		println!("Navigating to {}...", args.target_url);
		page.goto(&args.target_url).await.map_err(|e| color_eyre::eyre::eyre!("Failed to navigate: {}", e))?;

		// Gate all wiring on the quiz form actually rendering
		if wait_for_element(&page, &config.submit_selector, config.max_checks, config.check_interval()).await.is_none() {
			println!("Quiz form never appeared; nothing to do.");
			return Ok(());
		}

		let mut surface = DomSurface::new(page.clone(), config.form_selector.as_str(), config.submit_selector.as_str(), config.threshold_percent);
		if let Err(e) = surface.ensure_injected().await {
			// The form was there a moment ago; stand down rather than crash out
			elog!("Could not inject navigation buttons, standing down: {}", e);
			return Ok(());
		}

		let observer = DomObserver::new(page.clone(), config.submit_selector.as_str(), config.progress_selector.as_str());
		let classifier = LabelClassifier::new(config.advance_label.as_str(), config.terminal_label.as_str());
		let mut pager = AutoPager::new(observer, surface, classifier, config.threshold_percent, config.auto_page_interval());

		println!("Buttons wired. Press Ctrl+C to exit...");
		tokio::select! {
			result = pager.event_loop() => result,
			_ = tokio::signal::ctrl_c() => {
				println!("\nShutting down.");
				Ok(())
			}
		}
	}
	.await;

	drop(page);
	browser.close().await.map_err(|e| color_eyre::eyre::eyre!("Failed to close browser: {}", e))?;
	drop(browser);
	handle.abort();

	outcome
}
