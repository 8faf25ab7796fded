/*!

# Quick start

This example shows how to run a scorecard analysis end to end from a
spreadsheet of survey answers, for example one exported from Google Forms or
Microsoft Forms.

**Expected layout** The first row of the worksheet holds the column names.
There must be one column per questionnaire item (`pi1`, `pi2`, ... `td8` for
the built-in REMOTA configuration), each holding an integer between 1 and 5,
plus one column per profile attribute (`Faixa_idade`, `Faixa_renda`, `Sexo`,
`cargo`) holding a category label. Every following row is one respondent.
Column order does not matter; columns are located by name.

Run `scorecard` on the exported file:

```bash
scorecard -i respostas.xlsx --out stdout
```

You should see the summary of the analysis:

```text
[2026-08-25T14:02:11Z INFO  survey_scoring] run_scoring_stats: processing 132 respondents over 6 dimensions
[2026-08-25T14:02:11Z INFO  survey_scoring] Dimension Política Institucional: median 24 tier Prata
[2026-08-25T14:02:11Z INFO  survey_scoring] Dimension Ferramentas Tecnológicas: median 25 tier Ouro
[2026-08-25T14:02:11Z INFO  survey_scoring] Overall: median 26.5 over range [8, 40] tier Prata
```

followed by the JSON summary with the per-dimension medians and tiers, the
chart bars and all the cross-tabulations against the profile attributes.

**Generating the Word report** Pass a directory with `--report-dir`:

```bash
scorecard -i respostas.xlsx --report-dir ./out
```

This writes `Relatorio_Geral_ScoreCard_2026-08-25.docx` (the date is the
generation date) containing the classification section and one
cross-tabulation table per (dimension, attribute) pair.

**Item-level distributions** To look at single items of one dimension:

```bash
scorecard -i respostas.xlsx --dimension 'Ferramentas Tecnológicas' \
  --items ft1 --items ft2 --out stdout
```

Selecting no item for a dimension simply produces no distributions.

**Custom questionnaires** The dimension map and the profile attributes can
be replaced with the `--config` flag pointing to a JSON file; see the
`scorecard` binary documentation for the format. Embedders can skip the CLI
entirely and use [`crate::builder::Builder`] with their own
[`crate::ScoringConfig`].

*/
