use crate::args::CategoriesArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::TransactionType;
use crate::Result;
use anyhow::anyhow;
use std::collections::BTreeMap;

/// Lists the categories allowed for each transaction type, or for the one given with `--type`.
pub fn categories(args: CategoriesArgs) -> Result<Out<BTreeMap<String, Vec<String>>>> {
    let types: Vec<TransactionType> = match args.transaction_type() {
        Some(name) => vec![name
            .trim()
            .parse::<TransactionType>()
            .map_err(|_| anyhow!("\"{name}\" is not a recognized Transaction Type"))
            .pub_result(ErrorType::Validation)?],
        None => TransactionType::ALL.to_vec(),
    };

    let mut message = String::new();
    let mut structure = BTreeMap::new();
    for t in types {
        message.push_str(&format!("{t}:\n"));
        for c in t.categories() {
            message.push_str(&format!("  - {c}\n"));
        }
        structure.insert(
            t.to_string(),
            t.categories().iter().map(|c| c.to_string()).collect(),
        );
    }
    Ok(Out::new(message.trim_end(), structure))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_categories() {
        let out = categories(CategoriesArgs::new(None)).unwrap();
        let structure = out.structure().unwrap();
        assert_eq!(structure.len(), 3);
        assert_eq!(structure["Monthly Dues"], vec!["Regular Monthly Dues"]);
        assert!(out.message().contains("  - Expenditure: Gadzekpo"));
    }

    #[test]
    fn test_one_type() {
        let out = categories(CategoriesArgs::new(Some("Special Contributions".into()))).unwrap();
        let structure = out.structure().unwrap();
        assert_eq!(structure.len(), 1);
        assert_eq!(structure["Special Contributions"].len(), 4);
    }

    #[test]
    fn test_unknown_type() {
        let e = categories(CategoriesArgs::new(Some("Gifts".into()))).unwrap_err();
        assert_eq!(ErrorType::of(&e), Some(ErrorType::Validation));
    }
}
