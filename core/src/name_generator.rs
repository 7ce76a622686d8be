//! Deterministic customer names for synthetic snapshots.
//!
//! Personal names for walk-in customers, trade names for the bars and
//! restaurants that buy wholesale. Same RNG seed = same names.

use crate::rng::StreamRng;

pub struct NameGenerator;

impl NameGenerator {
    /// Full personal name (first + surname).
    pub fn generate_full_name(rng: &mut StreamRng) -> String {
        let first_name = Self::pick(rng, Self::first_names());
        let last_name = Self::pick(rng, Self::last_names());
        format!("{first_name} {last_name}")
    }

    /// Trade name such as "Bar do Souza" or "Empório Central".
    pub fn generate_business_name(rng: &mut StreamRng) -> String {
        let kind = Self::pick(rng, Self::business_kinds());
        if rng.chance(0.5) {
            format!("{kind} do {}", Self::pick(rng, Self::last_names()))
        } else {
            format!("{kind} {}", Self::pick(rng, Self::business_qualifiers()))
        }
    }

    fn pick(rng: &mut StreamRng, names: &'static [&'static str]) -> &'static str {
        names[rng.next_u64_below(names.len() as u64) as usize]
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Ana", "Beatriz", "Camila", "Daniela", "Eduarda", "Fernanda", "Gabriela",
            "Helena", "Isabela", "Juliana", "Larissa", "Mariana", "Natália", "Patrícia",
            "Renata", "Sofia", "Tatiane", "Vanessa", "Yasmin", "Luana", "Carolina",
            "Aline", "Bruna", "Letícia", "Priscila", "Raquel", "Simone", "Valéria",
            "André", "Bruno", "Carlos", "Diego", "Eduardo", "Felipe", "Gustavo",
            "Henrique", "Igor", "João", "Lucas", "Marcelo", "Nicolas", "Otávio",
            "Paulo", "Rafael", "Rodrigo", "Sérgio", "Thiago", "Vinícius", "Wagner",
            "Leonardo", "Matheus", "Ricardo", "Fábio", "Guilherme", "Roberto", "Caio",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Silva", "Santos", "Oliveira", "Souza", "Rodrigues", "Ferreira", "Alves",
            "Pereira", "Lima", "Gomes", "Costa", "Ribeiro", "Martins", "Carvalho",
            "Almeida", "Lopes", "Soares", "Fernandes", "Vieira", "Barbosa", "Rocha",
            "Dias", "Nascimento", "Andrade", "Moreira", "Nunes", "Marques", "Machado",
            "Mendes", "Freitas", "Cardoso", "Ramos", "Gonçalves", "Santana", "Teixeira",
            "Araújo", "Pinto", "Correia", "Cavalcanti", "Monteiro", "Moura", "Batista",
        ]
    }

    fn business_kinds() -> &'static [&'static str] {
        &["Bar", "Restaurante", "Empório", "Mercearia", "Lanchonete", "Pizzaria", "Boteco"]
    }

    fn business_qualifiers() -> &'static [&'static str] {
        &["Central", "da Praça", "Bom Sabor", "Estrela", "Primavera", "Avenida", "São Jorge"]
    }
}
