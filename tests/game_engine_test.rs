//! End-to-end game sessions driven by scripted input

use std::collections::VecDeque;
use std::io;

use animal_game::application::game::{
    CORRECT_GUESS, EMPTY_INPUT, INVALID_ANSWER, INVALID_CHOICE, LEARNED, RESET_DONE,
};
use animal_game::application::{ApplicationError, GameEngine, GameSettings, SessionEnd};
use animal_game::domain::{Answer, QuestionTree, SeedTree};
use animal_game::infrastructure::Terminal;
use animal_game::util::testing;

const MENU_PROMPT: &str = "Enter your choice (1/2/3/4): ";
const ROOT_PROMPT: &str = "Is your animal warm or cold blooded? (yes/no): ";

/// Mock terminal that replays scripted lines and records everything written
#[derive(Debug, Default)]
struct ScriptedTerminal {
    input: VecDeque<String>,
    output: String,
}

impl ScriptedTerminal {
    fn new(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|l| l.to_string()).collect(),
            output: String::new(),
        }
    }
}

impl Terminal for ScriptedTerminal {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }
}

fn play(lines: &[&str]) -> (Result<SessionEnd, ApplicationError>, QuestionTree, ScriptedTerminal) {
    testing::init_test_setup();
    let mut engine = GameEngine::new(GameSettings::default(), ScriptedTerminal::new(lines));
    let result = engine.run();
    let (tree, terminal) = engine.into_parts();
    (result, tree, terminal)
}

#[test]
fn given_fresh_game_when_guess_confirmed_then_celebrates_and_shows_menu() {
    let (result, tree, term) = play(&["yes", "yes", "4"]);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert!(term.output.starts_with("Welcome to The Animal Game!\n"));
    assert!(term.output.contains(ROOT_PROMPT));
    assert!(term.output.contains("Is it a Dog? (yes/no): "));
    assert!(term.output.contains(CORRECT_GUESS));
    assert!(term.output.contains("What would you like to do next?\n1. Play again\n"));
    assert!(term.output.contains("3. List all animals\n"));
    assert_eq!(tree.items(), vec!["Dog", "Snake"]);
}

#[test]
fn given_wrong_guess_when_teaching_cat_then_tree_learns_it() {
    let (result, tree, term) = play(&["no", "no", "Cat", "Does it meow?", "yes", "3", "4"]);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert!(term.output.contains("Is it a Snake? (yes/no): "));
    assert!(term.output.contains("I give up! What is your animal? "));
    assert!(term.output.contains("What question distinguishes a Cat from a Snake?\n"));
    assert!(term
        .output
        .contains("For a Cat, what is the answer to that question? (yes/no): "));
    assert!(term.output.contains(LEARNED));
    assert!(term
        .output
        .contains("Animals currently in memory:\n- Dog\n- Cat\n- Snake\n"));

    let learned = tree.traverse(tree.root(), Answer::No).unwrap();
    assert_eq!(tree.question(learned).unwrap(), "Does it meow?");
    let yes = tree.traverse(learned, Answer::Yes).unwrap();
    let no = tree.traverse(learned, Answer::No).unwrap();
    assert_eq!(tree.item(yes).unwrap().name(), "Cat");
    assert_eq!(tree.item(no).unwrap().name(), "Snake");
    assert_eq!(tree.items(), vec!["Dog", "Cat", "Snake"]);
}

#[test]
fn given_learned_tree_when_reset_chosen_then_back_to_seed_items() {
    let (result, tree, term) = play(&[
        "no", "no", "Cat", "Does it meow?", "yes", // learn Cat
        "2", // reset and play again
        "no", "yes", // guessed Snake
        "3", "4",
    ]);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert!(term.output.contains(RESET_DONE));
    assert!(term
        .output
        .ends_with("Animals currently in memory:\n- Dog\n- Snake\nWhat would you like to do next?\n1. Play again\n2. Reset memory and play again\n3. List all animals\n4. Quit\nEnter your choice (1/2/3/4): "));
    assert_eq!(tree.items(), vec!["Dog", "Snake"]);
}

#[test]
fn given_quit_when_chosen_then_no_further_prompts() {
    let (result, _, term) = play(&["yes", "yes", "4", "1", "yes"]);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert!(term.output.ends_with(MENU_PROMPT));
    assert_eq!(term.input.len(), 2, "input after quit is never read");
}

#[test]
fn given_invalid_answer_when_asked_then_reprompts_same_question() {
    let (result, tree, term) = play(&["maybe", "YES", "yes", "yes", "4"]);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert_eq!(term.output.matches(ROOT_PROMPT).count(), 3);
    assert_eq!(term.output.matches(INVALID_ANSWER).count(), 2);
    assert!(term.output.contains("Is it a Dog? (yes/no): "));
    assert_eq!(tree.len(), 3);
}

#[test]
fn given_invalid_confirmation_when_guessing_then_reprompts_guess() {
    let (result, _, term) = play(&["yes", "perhaps", "yes", "4"]);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert_eq!(term.output.matches("Is it a Dog? (yes/no): ").count(), 2);
    assert_eq!(term.output.matches(CORRECT_GUESS).count(), 1);
}

#[test]
fn given_invalid_menu_choice_when_entered_then_menu_redisplayed() {
    let (result, _, term) = play(&["yes", "yes", "9", "quit", "4"]);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert_eq!(term.output.matches(INVALID_CHOICE).count(), 2);
    assert_eq!(term.output.matches(MENU_PROMPT).count(), 3);
}

#[test]
fn given_invalid_answer_when_learning_then_reprompts_until_recognized() {
    let (result, tree, term) = play(&[
        "no", "no", "", "Cat", "  ", "Does it meow?", "sure", "no", "4",
    ]);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert_eq!(term.output.matches(EMPTY_INPUT).count(), 2);
    assert_eq!(term.output.matches(INVALID_ANSWER).count(), 1);
    let learned = tree.traverse(tree.root(), Answer::No).unwrap();
    let no = tree.traverse(learned, Answer::No).unwrap();
    assert_eq!(tree.item(no).unwrap().name(), "Cat");
    assert_eq!(tree.items(), vec!["Dog", "Snake", "Cat"]);
}

#[test]
fn given_learned_item_when_playing_again_then_it_can_be_guessed() {
    let (result, _, term) = play(&[
        "no", "no", "Cat", "Does it meow?", "yes", // learn Cat
        "1", // play again
        "no", "yes", "yes", // cold blooded? no; meows? yes; Cat? yes
        "4",
    ]);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert!(term.output.contains("Does it meow? (yes/no): "));
    assert!(term.output.contains("Is it a Cat? (yes/no): "));
    assert_eq!(term.output.matches(CORRECT_GUESS).count(), 1);
}

#[test]
fn given_exhausted_input_when_playing_then_input_closed() {
    let (result, tree, _) = play(&["no"]);

    assert!(matches!(result, Err(ApplicationError::InputClosed)));
    assert_eq!(tree.items(), vec!["Dog", "Snake"]);
}

#[test]
fn given_custom_settings_when_playing_then_prompts_use_label_and_seed() {
    testing::init_test_setup();
    let seed = SeedTree {
        question: "Is it sweet?".into(),
        yes_item: "Apple".into(),
        no_item: "Lemon".into(),
    };
    let settings = GameSettings {
        item_label: "fruit".into(),
    };
    let tree = QuestionTree::from_seed_tree(&seed).unwrap();
    let terminal = ScriptedTerminal::new(&["no", "no", "Lime", "Is it green?", "yes", "2", "yes", "yes", "3", "4"]);
    let mut engine = GameEngine::with_tree(settings, tree, terminal);

    assert_eq!(engine.run().unwrap(), SessionEnd::Quit);

    let out = &engine.terminal().output;
    assert!(out.starts_with("Welcome to The Fruit Game!\n"));
    assert!(out.contains("I give up! What is your fruit? "));
    assert!(out.contains("3. List all fruits\n"));
    assert!(out.contains("Fruits currently in memory:\n- Apple\n- Lemon\n"));
    assert_eq!(engine.tree().items(), vec!["Apple", "Lemon"]);
}

#[test]
fn given_engine_played_before_when_run_again_then_starts_from_seed() {
    testing::init_test_setup();
    let terminal = ScriptedTerminal::new(&[
        "no", "no", "Cat", "Does it meow?", "yes", "4", // first session learns Cat
        "no", "yes", "3", "4", // second session goes straight to Snake
    ]);
    let mut engine = GameEngine::new(GameSettings::default(), terminal);

    assert_eq!(engine.run().unwrap(), SessionEnd::Quit);
    assert_eq!(engine.tree().items(), vec!["Dog", "Cat", "Snake"]);

    assert_eq!(engine.run().unwrap(), SessionEnd::Quit);

    let out = &engine.terminal().output;
    let second = out
        .rfind("Welcome to The Animal Game!\n")
        .map(|pos| &out[pos..])
        .unwrap();
    assert!(!second.contains("Does it meow? (yes/no): "));
    assert!(second.contains("Is it a Snake? (yes/no): "));
    assert!(second.contains("Animals currently in memory:\n- Dog\n- Snake\n"));
    assert_eq!(engine.tree().items(), vec!["Dog", "Snake"]);
    assert!(engine.terminal().input.is_empty());
}
