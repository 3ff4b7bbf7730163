//! Word tables used by the name validator and the gender inference chain.
//!
//! All lookups go through [`fold`], so tables are stored lower-case and
//! without diacritics ("joão" and "joao" are the same key).

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use serde::Deserialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::ConfigError;

// Administrative and header noise found in pasted client lists.
const STOP_WORDS: &[&str] = &[
    "cliente", "clientes", "nome", "nomes", "name", "names", "telefone", "telefones", "tel",
    "fone", "celular", "cel", "whatsapp", "zap", "contato", "contatos", "contact", "phone",
    "mobile", "email", "mail", "emails", "endereco", "address", "cidade", "city", "estado",
    "state", "uf", "cpf", "cnpj", "rg", "data", "nascimento", "aniversario", "lista", "list",
    "cadastro", "cadastros", "sexo", "genero", "gender", "obs", "observacao", "observacoes",
    "status", "ativo", "ativa", "inativo", "novo", "nova", "total", "pagina", "planilha",
    "segue", "seguem", "abaixo", "dados", "informacoes", "sr", "sra", "srta", "dr", "dra",
    // particles
    "de", "da", "do", "dos", "das", "e",
    // gender columns
    "masculino", "feminino", "homem", "mulher", "male", "female", "masc", "fem",
    // state abbreviations
    "ac", "al", "ap", "am", "ba", "ce", "df", "es", "go", "ma", "mt", "ms", "mg", "pa", "pb",
    "pr", "pe", "pi", "rj", "rn", "rs", "ro", "rr", "sc", "sp", "se", "to",
    // single-word state names
    "acre", "alagoas", "amapa", "amazonas", "bahia", "ceara", "goias", "maranhao", "para",
    "paraiba", "parana", "pernambuco", "piaui", "rondonia", "roraima", "sergipe", "tocantins",
];

// Removed as whole phrases before tokenizing; their words stay usable alone.
const STOP_PHRASES: &[&str] = &[
    "distrito federal",
    "espirito santo",
    "mato grosso do sul",
    "mato grosso",
    "minas gerais",
    "rio de janeiro",
    "rio grande do norte",
    "rio grande do sul",
    "santa catarina",
    "sao paulo",
];

const FEMALE_NAMES: &[&str] = &[
    "maria", "ana", "juliana", "fernanda", "mariana", "camila", "amanda", "bruna", "beatriz",
    "leticia", "larissa", "gabriela", "julia", "luana", "aline", "vanessa", "jessica", "carla",
    "claudia", "sandra", "adriana", "marcia", "simone", "daniela", "renata", "tatiane",
    "raquel", "priscila", "isabela", "isabel", "alice", "sofia", "helena", "laura", "lara",
    "manuela", "valentina", "luiza", "giovanna", "rafaela", "vitoria", "carolina", "natalia",
    "bianca", "debora", "paula", "luciana", "cristina", "viviane", "elaine", "eliane",
    "rosana", "regina", "fatima", "aparecida", "francisca", "antonia", "raimunda", "joana",
    "lucia", "sonia", "vera", "tereza", "teresa", "rita", "rosa", "denise", "monica",
    "michele", "kelly", "karina", "thais", "taina", "yasmin", "agatha", "cecilia", "clara",
    "heloisa", "lorena", "livia", "esther", "ester", "rebeca", "sarah", "sara", "raissa",
    "ingrid", "irene", "ruth", "miriam", "carmen", "lais", "ines", "nicole", "jaqueline",
    "silvia", "gisele", "andreia", "andrea", "roberta", "flavia", "fabiana",
];

const MALE_NAMES: &[&str] = &[
    "joao", "jose", "antonio", "francisco", "carlos", "paulo", "pedro", "lucas", "luiz",
    "luis", "marcos", "gabriel", "rafael", "daniel", "marcelo", "bruno", "eduardo", "felipe",
    "rodrigo", "manoel", "manuel", "mateus", "matheus", "andre", "fernando", "fabio",
    "leonardo", "gustavo", "guilherme", "leandro", "tiago", "thiago", "anderson", "ricardo",
    "sergio", "vitor", "victor", "diego", "julio", "roberto", "jorge", "miguel", "arthur",
    "heitor", "bernardo", "davi", "david", "samuel", "enzo", "lorenzo", "theo", "henrique",
    "caio", "vinicius", "igor", "renato", "alexandre", "claudio", "marcio", "raimundo",
    "sebastiao", "joaquim", "benedito", "geraldo", "adriano", "wagner", "wellington",
    "alex", "otavio", "murilo", "nicolas", "benjamin", "joaquin", "emanuel", "cesar",
    "hugo", "ivan", "mario", "jonas", "elias", "moises", "isaac", "ismael", "joel", "josue",
    "luca", "nicola", "joshua", "jeremias", "matias", "tobias", "barnabe", "saulo",
];

// Given-name-shaped tokens ending in "a" that are not feminine.
const SUFFIX_EXCEPTIONS: &[&str] = &[
    "garcia", "costa", "silva", "souza", "sousa", "oliveira", "pereira", "ferreira", "moura",
    "rocha", "lima", "cunha", "vieira", "correia", "correa", "nogueira", "barbosa", "mota",
    "motta", "batista", "fonseca", "teixeira", "moreira", "siqueira", "vila", "vilela",
    "maia", "faria", "peixoto", "mendonca", "borba", "serra", "braga", "bezerra", "vega",
    "andrada", "luca", "nicola", "joshua",
];

const FEMALE_MARKERS: &[&str] = &["mulher", "feminino", "female", "fem", "sra", "srta", "dra"];
const MALE_MARKERS: &[&str] = &["homem", "masculino", "male", "masc", "sr", "dr"];

/// Lower-cases and strips diacritics.
pub fn fold(word: &str) -> String {
    word.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

static BUILTIN: LazyLock<Lexicon> = LazyLock::new(Lexicon::from_tables);

#[derive(Debug, Clone)]
pub struct Lexicon {
    stop_words: HashSet<String>,
    stop_phrases: Vec<String>,
    female_names: HashSet<String>,
    male_names: HashSet<String>,
    suffix_exceptions: HashSet<String>,
    female_markers: HashSet<String>,
    male_markers: HashSet<String>,
}

/// Extra entries merged on top of the built-in tables.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LexiconOverrides {
    pub stop_words: Vec<String>,
    pub stop_phrases: Vec<String>,
    pub female_names: Vec<String>,
    pub male_names: Vec<String>,
    pub suffix_exceptions: Vec<String>,
    pub female_markers: Vec<String>,
    pub male_markers: Vec<String>,
}

fn table(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| fold(w)).collect()
}

impl Lexicon {
    /// Shared built-in tables.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    fn from_tables() -> Self {
        let mut stop_phrases: Vec<String> = STOP_PHRASES.iter().map(|p| fold(p)).collect();
        // longest first so "mato grosso do sul" wins over "mato grosso"
        stop_phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));
        Lexicon {
            stop_words: table(STOP_WORDS),
            stop_phrases,
            female_names: table(FEMALE_NAMES),
            male_names: table(MALE_NAMES),
            suffix_exceptions: table(SUFFIX_EXCEPTIONS),
            female_markers: table(FEMALE_MARKERS),
            male_markers: table(MALE_MARKERS),
        }
    }

    /// Built-in tables extended with `overrides`.
    pub fn with_overrides(overrides: LexiconOverrides) -> Self {
        let mut lex = Lexicon::builtin().clone();
        let extend = |set: &mut HashSet<String>, words: Vec<String>| {
            set.extend(words.iter().map(|w| fold(w.trim())).filter(|w| !w.is_empty()));
        };
        extend(&mut lex.stop_words, overrides.stop_words);
        extend(&mut lex.female_names, overrides.female_names);
        extend(&mut lex.male_names, overrides.male_names);
        extend(&mut lex.suffix_exceptions, overrides.suffix_exceptions);
        extend(&mut lex.female_markers, overrides.female_markers);
        extend(&mut lex.male_markers, overrides.male_markers);

        for phrase in overrides.stop_phrases {
            let phrase = fold(phrase.trim());
            if !phrase.is_empty() && !lex.stop_phrases.contains(&phrase) {
                lex.stop_phrases.push(phrase);
            }
        }
        lex.stop_phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));
        lex
    }

    /// Loads overrides from a TOML/JSON/YAML file (format picked by extension).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let overrides: LexiconOverrides = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        Ok(Lexicon::with_overrides(overrides))
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(&fold(token))
    }

    pub fn stop_phrases(&self) -> &[String] {
        &self.stop_phrases
    }

    pub fn is_female_name(&self, token: &str) -> bool {
        self.female_names.contains(&fold(token))
    }

    pub fn is_male_name(&self, token: &str) -> bool {
        self.male_names.contains(&fold(token))
    }

    pub fn is_known_first_name(&self, token: &str) -> bool {
        let key = fold(token);
        self.female_names.contains(&key) || self.male_names.contains(&key)
    }

    pub fn is_suffix_exception(&self, token: &str) -> bool {
        self.suffix_exceptions.contains(&fold(token))
    }

    pub fn is_female_marker(&self, token: &str) -> bool {
        self.female_markers.contains(&fold(token))
    }

    pub fn is_male_marker(&self, token: &str) -> bool {
        self.male_markers.contains(&fold(token))
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("João"), "joao");
        assert_eq!(fold("SEBASTIÃO"), "sebastiao");
        assert_eq!(fold("Márcia"), "marcia");
    }

    #[test]
    fn lookups_ignore_diacritics() {
        let lex = Lexicon::builtin();
        assert!(lex.is_male_name("João"));
        assert!(lex.is_male_name("joao"));
        assert!(lex.is_female_name("Letícia"));
        assert!(lex.is_stop_word("Endereço"));
        assert!(!lex.is_stop_word("Pedro"));
    }

    #[test]
    fn paulo_is_a_name_but_sao_paulo_is_a_phrase() {
        let lex = Lexicon::builtin();
        assert!(lex.is_male_name("Paulo"));
        assert!(!lex.is_stop_word("paulo"));
        assert!(lex.stop_phrases().iter().any(|p| p == "sao paulo"));
    }

    #[test]
    fn longest_phrase_first() {
        let lex = Lexicon::builtin();
        let long = lex.stop_phrases().iter().position(|p| p == "mato grosso do sul");
        let short = lex.stop_phrases().iter().position(|p| p == "mato grosso");
        assert!(long < short);
    }

    #[test]
    fn overrides_extend_tables() {
        let lex = Lexicon::with_overrides(LexiconOverrides {
            female_names: vec!["Iracema".into()],
            stop_words: vec!["Fornecedor".into()],
            ..Default::default()
        });
        assert!(lex.is_female_name("iracema"));
        assert!(lex.is_stop_word("fornecedor"));
        // built-ins survive
        assert!(lex.is_female_name("maria"));
        assert!(!Lexicon::builtin().is_female_name("iracema"));
    }

    #[test]
    fn load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "male_names = [\"Ubirajara\"]\nstop_phrases = [\"Vale do Ribeira\"]").unwrap();
        let lex = Lexicon::load(file.path()).unwrap();
        assert!(lex.is_male_name("Ubirajara"));
        assert!(lex.stop_phrases().iter().any(|p| p == "vale do ribeira"));
    }
}
