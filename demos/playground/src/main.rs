//! Drives every widget context through a short scripted session on a
//! virtual clock. Run with `RUST_LOG=debug` to see state transitions.
//!
//! An optional argument names a JSON file overriding the defaults:
//!
//! ```json
//! { "toast": { "max_toasts": 2, "position": "top-center" }, "counter": { "max": 3 } }
//! ```

use std::rc::Rc;
use std::time::Duration;

use anyhow::Context as _;
use hearth_core::{Context, Scope, TimerQueue};
use hearth_theme::{
    ManualSystemSignal, RecordingPresentation, ResolvedTheme, ThemeOptions, ThemeServices,
    create_theme_context, seed_document_theme, theme_context,
};
use hearth_widgets::prelude::*;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlaygroundConfig {
    toast: ToastConfig,
    counter: CounterOptions,
}

fn load_config() -> anyhow::Result<PlaygroundConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(PlaygroundConfig::default());
    };
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = load_config()?;
    log::info!("playground config: {config:?}");

    let (timers, clock) = TimerQueue::manual();
    let system = ManualSystemSignal::new(ResolvedTheme::Light);
    let presentation = RecordingPresentation::new();

    let scope = Scope::new();
    let (toasts, tabs, accordion, counter, theme) = scope.run(|| {
        let toasts = create_toast_context(config.toast, timers.clone());
        let tabs = create_tabs_context(TabsOptions {
            default_tab: Some("overview".into()),
            on_tab_change: Some(Rc::new(|id: &str| log::info!("tab -> {id}"))),
            ..Default::default()
        });
        let accordion = create_accordion_context(AccordionOptions {
            single: true,
            on_expanded_change: Some(Rc::new(|ids: &[String]| log::info!("expanded -> {ids:?}"))),
            ..Default::default()
        });
        let counter = create_counter_context(config.counter);
        let theme = create_theme_context(
            ThemeOptions::default(),
            ThemeServices::default()
                .with_system(system.clone())
                .with_presentation(presentation.clone()),
        );
        (toasts, tabs, accordion, counter, theme)
    });

    // Consumers reach everything through the provider tree.
    theme.clone().provide(|| {
        toasts.clone().provide(|| {
            tabs.clone().provide(|| {
                tabs_context().register_tab("overview");
                tabs_context().register_tab("settings");
                tabs_context().set_active_tab("settings");
            });
            toast_context().success("Saved", None);
            toast_context().info("Syncing", Some(Duration::from_secs(1)));
            theme_context().toggle();
        })
    });

    accordion.toggle("faq-1");
    accordion.toggle("faq-2");
    for _ in 0..5 {
        counter.increment();
    }
    log::info!("counter at {} (max reached: {})", counter.count(), counter.is_at_max());

    system.set(ResolvedTheme::Dark);
    log::info!("theme {} (preference {})", theme.mode(), theme.preference());

    clock.advance(Duration::from_secs(1));
    let fired = timers.poll();
    log::info!("{fired} toast(s) expired, {} still visible", toasts.len());

    let html = seed_document_theme(r#"<html data-theme="">"#, Some(theme.preference().as_str()));
    log::info!("seeded document: {html}");
    log::info!("presentation updates: {:?}", presentation.events());

    scope.dispose();
    log::info!(
        "after teardown: {} pending timers, toast context destroyed: {}",
        timers.pending(),
        toasts.is_destroyed()
    );
    Ok(())
}
