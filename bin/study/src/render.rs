use chrono::{DateTime, Utc};
use fd_study::{Phase, Session, keymap::SHORTCUTS};

pub fn screen(title: &str, session: &Session, help_open: bool, now: DateTime<Utc>) {
    if help_open {
        help();
        return;
    }

    match session.phase() {
        Phase::Completed => {
            let summary = session.summary(now);
            println!();
            println!("== {title}: session complete ==");
            println!("{}", summary.message());
            println!(
                "Correct {}  Incorrect {}  Accuracy {}%  Time {}",
                summary.correct,
                summary.incorrect,
                summary.accuracy_percent,
                summary.elapsed_display()
            );
            println!("[r] study again  [b] back");
        }
        phase => {
            let Some(card) = session.current_card() else {
                return;
            };
            let (position, total) = session.position();
            let tally = session.tally();

            println!();
            println!(
                "{title}  card {position}/{total}  ({:.0}% done, {} correct, {} incorrect)",
                session.progress_percent(),
                tally.correct,
                tally.incorrect
            );
            println!("Q: {}", card.front);
            if phase == Phase::ShowingBack {
                println!("A: {}", card.back);
                println!("[1] incorrect  [2] correct");
            } else {
                println!("[space] show answer  [?] help");
            }
        }
    }
}

fn help() {
    println!();
    println!("Keyboard shortcuts");
    for shortcut in SHORTCUTS {
        println!(
            "  {:<32} {:<12} {}",
            shortcut.keys.join(", "),
            format!("{:?}", shortcut.when),
            shortcut.description
        );
    }
    println!("Press ? or esc to close");
}
