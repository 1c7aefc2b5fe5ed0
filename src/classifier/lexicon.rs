use super::PolarityClassifier;
use crate::error::Result;

/// Offline polarity: positive lexicon hits minus negative lexicon hits
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        let to_owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            positive: to_owned(&[
                "满意", "谢谢", "感谢", "不错", "很好", "方便", "及时", "专业", "辛苦",
                "解决了", "愉快", "放心",
            ]),
            negative: to_owned(&[
                "投诉", "不满", "生气", "退货", "故障", "坏了", "失望", "太慢", "没人",
                "不行", "糟糕", "骗",
            ]),
        }
    }
}

impl LexiconClassifier {
    pub fn score(&self, text: &str) -> i64 {
        let hits = |words: &[String]| -> i64 {
            words
                .iter()
                .filter(|w| !w.is_empty())
                .map(|w| text.matches(w.as_str()).count() as i64)
                .sum()
        };
        hits(&self.positive) - hits(&self.negative)
    }
}

impl PolarityClassifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<f64> {
        Ok(self.score(text) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_score() {
        let lexicon = LexiconClassifier::default();

        assert_eq!(lexicon.score("谢谢，很满意"), 2);
        assert_eq!(lexicon.score("我要投诉，空调又坏了"), -2);
        assert_eq!(lexicon.score("好的"), 0);
    }

    #[test]
    fn test_empty_entries_ignored() {
        let lexicon = LexiconClassifier {
            positive: vec![String::new()],
            negative: vec![],
        };
        assert_eq!(lexicon.score("任何文本"), 0);
    }
}
