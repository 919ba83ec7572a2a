/// Bundled texts shown before the user loads their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleText {
    pub title: &'static str,
    pub text: &'static str,
}

pub const WELCOME_TEXT: &str = "Welcome to lexio! This is a reading and typing trainer that lets you practice with content you actually want to read. Flash through text one word at a time, or type it out and watch your speed and accuracy improve. The more you practice, the better you get. Try loading your own text to make practice count twice. Happy reading!";

pub const SAMPLE_TEXTS: &[SampleText] = &[
    SampleText {
        title: "Quick Practice",
        text: "The quick brown fox jumps over the lazy dog. This pangram contains every letter of the alphabet, making it perfect for quick typing practice.",
    },
    SampleText {
        title: "The Art of Touch Typing",
        text: "Touch typing is the ability to type without looking at the keyboard. It's a skill that can dramatically increase your productivity and reduce strain on your hands and wrists. The key is muscle memory. By practicing consistently, your fingers learn where each key is located. Start slowly, focusing on accuracy rather than speed. Speed will come naturally as your muscle memory develops. Remember, every expert typist started as a beginner. With regular practice, you can achieve typing speeds of 60 words per minute or more.",
    },
    SampleText {
        title: "The Power of Practice",
        text: "Deliberate practice is the key to mastery in any skill, and typing is no exception. Unlike mindless repetition, deliberate practice involves focused attention on improving specific aspects of your performance. When you practice typing, pay attention to your mistakes. Which keys do you frequently miss? Which finger movements feel awkward? By identifying and addressing these weak points, you'll improve much faster than if you simply type without thinking. Track your progress over time and celebrate small improvements.",
    },
    SampleText {
        title: "Reading at Speed",
        text: "Rapid serial visual presentation shows one word at a time at a fixed point, so your eyes never have to travel across the line. Without the cost of eye movement, most people can comfortably read far faster than on a printed page. Start around 300 words per minute and raise the pace in small steps. Comprehension follows practice: the first sessions feel rushed, then the stream starts to read like a voice.",
    },
];

/// Look a sample up by its position in `--list-samples` output.
pub fn sample_by_index(index: usize) -> Option<&'static SampleText> {
    SAMPLE_TEXTS.get(index)
}
