use std::fs;
use std::path::{Path, PathBuf};

use composter_core::{unpack, Component, CrawlOptions, Crawler};
use tempfile::TempDir;
use walkdir::WalkDir;

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn setup_project(root: &Path) -> PathBuf {
    write(
        root,
        "package.json",
        r#"{"dependencies": {"clsx": "^2.0.0", "react": "^18.2.0"}}"#,
    );
    write(
        root,
        "src/components/Button.jsx",
        "import React from 'react';\n\
         import clsx from 'clsx';\n\
         import Icon from './Icon';\n\
         import { cn } from '@/lib/cn';\n\
         import './Button.css';\n\
         export default function Button() { return <Icon className={cn(clsx('b'))} />; }\n",
    );
    write(
        root,
        "src/components/Icon/index.tsx",
        "import { Slot } from '@radix-ui/react-slot';\nexport default () => null;\n",
    );
    write(root, "src/components/Button.css", ".button { color: red; }\n");
    write(
        root,
        "src/lib/cn.ts",
        "import { twMerge } from 'tailwind-merge';\nexport const cn = twMerge;\n",
    );
    // Never imported, must not be bundled.
    write(root, "src/components/Unused.jsx", "export default 1;\n");
    root.join("src/components/Button.jsx")
}

fn files_on_disk(dir: &Path) -> Vec<String> {
    let mut out: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    out.sort();
    out
}

#[test]
fn test_crawl_collects_transitive_local_files() {
    let tmp = TempDir::new().unwrap();
    let entry = setup_project(tmp.path());

    let report = Crawler::new(CrawlOptions::default()).crawl(&entry).unwrap();

    assert_eq!(
        report.files.keys().collect::<Vec<_>>(),
        vec![
            "/src/components/Button.css",
            "/src/components/Button.jsx",
            "/src/components/Icon/index.tsx",
            "/src/lib/cn.ts",
        ]
    );
    assert_eq!(report.dependencies["react"], "^18.2.0");
    assert_eq!(report.dependencies["clsx"], "^2.0.0");
    assert_eq!(report.dependencies["@radix-ui/react-slot"], "latest");
    assert_eq!(report.dependencies["tailwind-merge"], "latest");
    assert!(report.is_clean(), "warnings: {:?}", report.warnings);
}

#[test]
fn test_unpack_then_recrawl_round_trips() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("project");
    let entry = setup_project(&project);
    let crawler = Crawler::new(CrawlOptions::default());

    let original = crawler.crawl(&entry).unwrap();
    let bundle = original.clone().into_bundle("Button", "ui").unwrap();

    // What the vault hands back on pull.
    let record = Component {
        id: Some("c1".into()),
        title: bundle.title.clone(),
        code: Some(bundle.code.clone()),
        dependencies: serde_json::to_value(&bundle.dependencies).unwrap(),
        created_at: None,
        category: None,
    };

    let out = tmp.path().join("out");
    let report = unpack(&record, &out).unwrap();
    assert_eq!(report.written.len(), original.files.len());
    assert_eq!(
        files_on_disk(&out),
        vec![
            "src/components/Button.css",
            "src/components/Button.jsx",
            "src/components/Icon/index.tsx",
            "src/lib/cn.ts",
        ]
    );

    // Anchor the unpacked tree with its own manifest, then crawl it again.
    fs::write(out.join("package.json"), "{}").unwrap();
    let again = crawler
        .crawl(&out.join("src/components/Button.jsx"))
        .unwrap();

    assert_eq!(again.files, original.files);
    assert_eq!(
        again.dependencies.keys().collect::<Vec<_>>(),
        original.dependencies.keys().collect::<Vec<_>>()
    );
    assert_eq!(record.dependency_map(), original.dependencies);
}
