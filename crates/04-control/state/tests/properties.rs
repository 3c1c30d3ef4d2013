use command::CommandQueue;
use event::Event;
use parking_lot::Mutex;
use proptest::prelude::*;
use proptest::sample::subsequence;
use state::{
    branch_options, BranchOption, Links, MachineBuilder, OptionMap, OptionMask, State, StateCx,
    StateId, StateKind, StateMachine,
};
use std::sync::Arc;
use telemetry::{CapturedNotices, Telemetry};

type Log = Arc<Mutex<Vec<String>>>;

const LEAVES: [&str; 5] = ["a", "b", "c", "d", "e"];

branch_options! {
    enum DeckOp {
        Push => "push",
        Shown => "shown",
        Masked => "masked",
    }
}

/// Branch whose `push` option pushes the named leaves in the order given.
struct Deck {
    leaves: Vec<(&'static str, StateId)>,
    log: Log,
}

impl State for Deck {
    fn name(&self) -> &'static str {
        "deck"
    }

    fn kind(&self) -> StateKind {
        StateKind::Branch
    }

    fn options(&self) -> (OptionMap, OptionMask) {
        (DeckOp::map(), OptionMask::of(&[DeckOp::Push, DeckOp::Shown]))
    }

    fn handle_event(&mut self, event: &mut Event, cx: &mut StateCx<'_>) {
        let Some((op, rest)) = cx.extract::<DeckOp>(event) else {
            return;
        };
        event.set_handled();
        match op {
            DeckOp::Push => {
                for name in rest.split_whitespace() {
                    if let Some(&(_, id)) = self.leaves.iter().find(|(n, _)| *n == name) {
                        cx.push_state(id);
                    }
                }
            }
            DeckOp::Shown => self.log.lock().push("shown".into()),
            DeckOp::Masked => self.log.lock().push("masked".into()),
        }
    }
}

struct Card {
    name: &'static str,
    log: Log,
}

impl State for Card {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> StateKind {
        StateKind::Leaf
    }

    fn handle_event(&mut self, _event: &mut Event, _cx: &mut StateCx<'_>) {}

    fn on_enter(&mut self, _cx: &mut StateCx<'_>) {
        self.log.lock().push(format!("enter {}", self.name));
    }
}

fn deck() -> (StateMachine, Log, Telemetry) {
    let telemetry = Telemetry::new();
    let links = Links {
        queue: CommandQueue::new(telemetry.clone()),
        notices: Arc::new(CapturedNotices::new()),
        telemetry: telemetry.clone(),
        announce_unrecognized: false,
    };
    let log: Log = Arc::default();
    let mut b = MachineBuilder::new(links);
    let leaves: Vec<_> = LEAVES
        .iter()
        .map(|&name| {
            let id = b.add(Card {
                name,
                log: log.clone(),
            });
            (name, id)
        })
        .collect();
    let ids: Vec<_> = leaves.iter().map(|&(_, id)| id).collect();
    let root = b.add(Deck {
        leaves,
        log: log.clone(),
    });
    b.adopt(root, &ids);
    (b.build(root), log, telemetry)
}

fn line(machine: &mut StateMachine, text: &str) -> bool {
    let mut event = Event::command_line(text);
    let handled = machine.dispatch(&mut event);
    machine.flush_edits();
    handled
}

fn pushed_leaves() -> impl Strategy<Value = Vec<&'static str>> {
    subsequence(LEAVES.to_vec(), 1..=LEAVES.len()).prop_shuffle()
}

proptest! {
    /// Any batch of leaves pushed in one flush is entered in push order, with the last on top.
    #[test]
    fn batch_enters_in_push_order(order in pushed_leaves()) {
        let (mut machine, log, _) = deck();
        let cmd = format!("push {}", order.join(" "));
        prop_assert!(line(&mut machine, &cmd));

        let entered: Vec<String> = order.iter().map(|n| format!("enter {n}")).collect();
        prop_assert_eq!(&*log.lock(), &entered);
        let mut stack = vec!["deck"];
        stack.extend(order.iter().copied());
        prop_assert_eq!(machine.stack_names(), stack);
        prop_assert_eq!(machine.top(), machine.id_of(order[order.len() - 1]));
    }

    /// A first word is handled exactly when it names an enabled option.
    #[test]
    fn only_enabled_options_route(
        words in prop::collection::vec(
            prop::sample::select(vec!["shown", "masked", "push", "bogus", "SHOWN"]),
            1..20,
        )
    ) {
        let (mut machine, log, telemetry) = deck();
        let mut shown = 0;
        let mut unhandled = 0;
        for word in &words {
            let handled = line(&mut machine, word);
            let enabled = matches!(*word, "shown" | "push");
            prop_assert_eq!(handled, enabled, "word {}", word);
            if *word == "shown" {
                shown += 1;
            }
            if !enabled {
                unhandled += 1;
            }
        }
        prop_assert_eq!(log.lock().len(), shown);
        prop_assert_eq!(machine.stack_names(), ["deck"]);
        prop_assert_eq!(telemetry.snapshot().events_unhandled, unhandled);
    }
}
