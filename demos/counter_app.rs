//! Counter application wiring stores, binders and a host mount together

use serde::Serialize;
use tincan_connect::{
    connect, connect_as, shallow_eq, store_set, view, Cycle, Mount, Store, WithStore, WithStores,
};

#[derive(Clone, Debug, Serialize)]
struct CounterState {
    count: i32,
    step: i32,
    history: Vec<i32>,
}

impl CounterState {
    fn new() -> Self {
        Self {
            count: 0,
            step: 1,
            history: vec![0],
        }
    }

    fn increment(&mut self) {
        self.count += self.step;
        self.history.push(self.count);
    }
}

#[derive(Clone, Debug, Serialize)]
struct Theme {
    accent: String,
}

#[derive(Clone)]
struct Header {
    title: String,
}

shallow_eq!(Header { title });

store_set! {
    struct AppStores => AppSnapshots {
        counter: Store<CounterState>,
        theme: Store<Theme>,
    }
}

fn report(label: &str, cycle: Cycle, output: &str) {
    println!("   {label:<28} {cycle:?}: {output}");
}

fn main() {
    println!("=== Counter Application ===\n");

    let counter = Store::new(CounterState::new());
    let theme = Store::new(Theme {
        accent: "blue".to_string(),
    });

    println!("1. Single-store binder");
    let display = view(|p: &WithStore<Header, CounterState>| {
        format!("{} = {} (step {})", p.title, p.store.count, p.store.step)
    })
    .named("CounterDisplay");
    let binder = connect(counter.clone(), display).expect("bind counter");
    let mut single = Mount::new(
        binder,
        Header {
            title: "Count".to_string(),
        },
    );
    println!("   mounted {}", single.output());

    println!("\n2. Multi-store binder");
    let stores = AppStores {
        counter: counter.clone(),
        theme: theme.clone(),
    };
    let badge = view(|p: &WithStores<(), AppSnapshots>| {
        format!("[{}] {}", p.stores.theme.accent, p.stores.counter.count)
    })
    .named("Badge");
    let mut multi = Mount::new(connect_as(stores, badge).expect("bind stores"), ());
    println!("   mounted {}", multi.output());

    println!("\n3. Incrementing");
    for _ in 0..2 {
        counter.update("count", CounterState::increment).expect("update");
        let cycle = single.flush();
        report("display", cycle, single.output());
        let cycle = multi.flush();
        report("badge", cycle, multi.output());
    }

    println!("\n4. Writing the same step back");
    counter.update("step", |s| s.step = 1).expect("update");
    report("display", single.flush(), single.output());
    report("badge", multi.flush(), multi.output());

    println!("\n5. Changing the theme only");
    theme
        .update("accent", |t| t.accent = "green".to_string())
        .expect("update");
    report("display", single.flush(), single.output());
    report("badge", multi.flush(), multi.output());

    println!("\n6. Parent passes props");
    let same = Header {
        title: "Count".to_string(),
    };
    report("display (same title)", single.set_props(same), single.output());
    let renamed = Header {
        title: "Total".to_string(),
    };
    report("display (new title)", single.set_props(renamed), single.output());

    println!("\n7. Render stats");
    println!("   display: {:?}", single.stats());
    println!("   badge:   {:?}", multi.stats());

    println!("\n8. Unmounting");
    single.unmount().expect("unmount display");
    multi.unmount().expect("unmount badge");
    println!(
        "   listeners left: counter={}, theme={}",
        counter.listener_count(),
        theme.listener_count()
    );

    println!("\n✓ Counter application complete!");
}
